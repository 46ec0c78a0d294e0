//! Processor credentials and checkout settings.
//!
//! Loaded once from a TOML file before the server starts, validated, and then
//! shared read-only with the processor client and the request handlers.

use crate::error::{Error, Result, validation_reason};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use validator::{Validate, ValidationError, ValidationErrors};

/// Credentials, contract identifiers and script URLs for the card processor.
#[derive(Clone, PartialEq, Deserialize, Validate)]
pub struct ProcessorConfig {
    /// Base URL of the processor API, e.g. `https://cst.test-gsc.vfims.com`.
    #[validate(
        url(message = "must be an http(s) URL"),
        custom(function = "http_scheme", message = "must be an http(s) URL")
    )]
    pub api_uri: String,
    /// Pre-encoded HTTP Basic credential (`base64(user:key)`).
    #[validate(custom(function = "not_blank", message = "must not be empty"))]
    pub basic_token: String,
    /// Payment provider contract used for card transactions.
    #[validate(custom(function = "not_blank", message = "must not be empty"))]
    pub ppc_id: String,
    #[validate(custom(function = "not_blank", message = "must not be empty"))]
    pub threeds_contract_id: String,
    /// Alias of the public key the browser encrypted the card with.
    #[validate(custom(function = "not_blank", message = "must not be empty"))]
    pub key_alias: String,
    /// ISO 4217 code, e.g. `ISK`.
    #[validate(custom(function = "currency_code", message = "must be a 3-letter code"))]
    pub contract_currency: String,
    /// Public key handed to the browser-side card encryption script.
    #[validate(custom(function = "not_blank", message = "must not be empty"))]
    pub public_key: String,
    #[validate(url(message = "must be a URL"))]
    pub verifone_js_url: String,
    #[validate(url(message = "must be a URL"))]
    pub songbird_js_url: String,
    /// Amount charged per checkout.
    #[serde(default = "default_amount")]
    #[validate(custom(function = "positive", message = "must be positive"))]
    pub amount: Decimal,
}

fn default_amount() -> Decimal {
    dec!(10)
}

fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

fn http_scheme(value: &str) -> std::result::Result<(), ValidationError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ValidationError::new("http_scheme"))
    }
}

fn currency_code(value: &str) -> std::result::Result<(), ValidationError> {
    if value.len() == 3 && value.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::new("currency_code"))
    }
}

fn positive(value: &Decimal) -> std::result::Result<(), ValidationError> {
    if *value > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("positive"))
    }
}

/// One line per broken rule, sorted so the message is stable.
fn invalid_config(errors: ValidationErrors) -> Error {
    let mut problems: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors
                .iter()
                .map(move |error| format!("`{field}` {}", validation_reason(error)))
        })
        .collect();
    problems.sort();
    problems.dedup();
    Error::InvalidConfig(problems.join("; "))
}

impl fmt::Debug for ProcessorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessorConfig")
            .field("api_uri", &self.api_uri)
            .field("basic_token", &"<redacted>")
            .field("ppc_id", &self.ppc_id)
            .field("threeds_contract_id", &self.threeds_contract_id)
            .field("key_alias", &self.key_alias)
            .field("contract_currency", &self.contract_currency)
            .field("verifone_js_url", &self.verifone_js_url)
            .field("songbird_js_url", &self.songbird_js_url)
            .field("amount", &self.amount)
            .finish_non_exhaustive()
    }
}

impl ProcessorConfig {
    /// Reads and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// holds values that fail validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate().map_err(invalid_config)?;
        Ok(config)
    }

    /// Joins an endpoint path onto `api_uri`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_uri.trim_end_matches('/'), path)
    }
}
