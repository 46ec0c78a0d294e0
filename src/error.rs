use thiserror::Error;

/// Startup and wiring failures. Per-request failures use the closed
/// per-operation enums below and never reach this type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds of the 3DS token (JWT) request.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Transport failure, or a body that is not JSON at all.
    #[error("request for a 3-D Secure token failed")]
    Request,
    /// The processor answered with a non-2xx status.
    #[error("processor rejected the 3-D Secure token request")]
    Response,
    /// JSON body without a usable `jwt` field.
    #[error("3-D Secure token response has an unexpected shape")]
    BodyParse,
}

/// Failure kinds of the 3DS lookup.
///
/// A non-2xx status is not a failure here, only the body is judged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    #[error("3-D Secure lookup request failed")]
    Request,
    /// Body could not be decoded as JSON.
    #[error("3-D Secure lookup response is not JSON")]
    Decode,
    #[error("3-D Secure lookup response has an unexpected shape")]
    BodyParse,
}

/// Failure kinds of the card payment submission.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeError {
    #[error("card payment request failed")]
    Request,
    #[error("card payment response is not JSON")]
    Decode,
    #[error("card payment response has an unexpected shape")]
    BodyParse,
}

/// A single rule broken by an incoming submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub reason: String,
}

/// Malformed client input, reported as `InvalidSubmissionData`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The body could not be read into the expected shape at all.
    #[error("{0}")]
    Malformed(String),
    /// The shape was right but one or more fields broke a rule.
    #[error("{}", render_violations(.0))]
    Invalid(Vec<FieldViolation>),
}

/// Text of a single broken rule: its message if one was set, else its code.
pub(crate) fn validation_reason(error: &validator::ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => error.code.to_string(),
    }
}

fn render_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("✖ {}\n  → at {}", v.reason, v.field))
        .collect::<Vec<_>>()
        .join("\n")
}
