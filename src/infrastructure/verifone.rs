use crate::config::ProcessorConfig;
use crate::domain::payment::{ChargeRequest, LookupRequest, PaymentResult};
use crate::domain::ports::PaymentProcessor;
use crate::domain::threeds::{ThreeDSEvidence, ThreeDSLookupResult};
use crate::error::{ChargeError, LookupError, Result, TokenError};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;
use tracing::{debug, warn};

const TOKEN_PATH: &str = "/oidc/3ds-service/v2/jwt/create";
const LOOKUP_PATH: &str = "/oidc/3ds-service/v2/lookup";
const CARD_TRANSACTION_PATH: &str = "/oidc/api/v2/transactions/card";

/// Client for Verifone's 3DS service and card transaction API.
///
/// Holds a pooled `reqwest::Client` and the read-only processor config. Cheap
/// to share behind an `Arc`; no request state is kept between calls.
pub struct VerifoneClient {
    http: reqwest::Client,
    config: Arc<ProcessorConfig>,
}

impl VerifoneClient {
    /// Builds a client with the transport's default settings.
    pub fn new(config: Arc<ProcessorConfig>) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_http_client(config, http))
    }

    pub fn with_http_client(config: Arc<ProcessorConfig>, http: reqwest::Client) -> Self {
        Self { http, config }
    }

    fn post<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> reqwest::RequestBuilder {
        self.http
            .post(url)
            .header(AUTHORIZATION, format!("Basic {}", self.config.basic_token))
            .header(ACCEPT, "application/json")
            .json(body)
    }
}

/// Why a response body could not be turned into the expected type.
enum BodyFailure {
    Read(reqwest::Error),
    Decode(serde_json::Error),
    Shape(serde_json::Error),
}

impl std::fmt::Display for BodyFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(e) => write!(f, "reading body: {e}"),
            Self::Decode(e) => write!(f, "decoding JSON: {e}"),
            Self::Shape(e) => write!(f, "validating body: {e}"),
        }
    }
}

async fn read_body<T: DeserializeOwned>(
    response: reqwest::Response,
) -> std::result::Result<T, BodyFailure> {
    let bytes = response.bytes().await.map_err(BodyFailure::Read)?;
    let json: serde_json::Value = serde_json::from_slice(&bytes).map_err(BodyFailure::Decode)?;
    serde_json::from_value(json).map_err(BodyFailure::Shape)
}

/// Whole amounts go out as JSON integers, anything else as a float.
fn serialize_amount<S: Serializer>(
    amount: &Decimal,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    if amount.fract().is_zero()
        && let Some(whole) = amount.to_i64()
    {
        return serializer.serialize_i64(whole);
    }
    match amount.to_f64() {
        Some(value) => serializer.serialize_f64(value),
        None => Err(serde::ser::Error::custom(format!("amount {amount} is out of range"))),
    }
}

#[derive(Serialize)]
struct TokenBody<'a> {
    threeds_contract_id: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    jwt: String,
}

#[derive(Serialize)]
struct LookupBody<'a> {
    #[serde(serialize_with = "serialize_amount")]
    amount: Decimal,
    billing_first_name: &'a str,
    billing_last_name: &'a str,
    billing_address_1: &'a str,
    billing_city: &'a str,
    billing_country_code: &'a str,
    email: &'a str,
    encrypted_card: &'a str,
    public_key_alias: &'a str,
    currency_code: &'a str,
    device_info_id: &'a str,
    merchant_reference: &'a str,
    threeds_contract_id: &'a str,
}

#[derive(Serialize)]
struct ChargeBody<'a> {
    payment_provider_contract: &'a str,
    #[serde(serialize_with = "serialize_amount")]
    amount: Decimal,
    merchant_reference: &'a str,
    threed_authentication: &'a ThreeDSEvidence,
    customer_details: CustomerDetails<'a>,
    currency_code: &'a str,
    encrypted_card: &'a str,
    public_key_alias: &'a str,
}

#[derive(Serialize)]
struct CustomerDetails<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email_address: &'a str,
    billing: Billing<'a>,
}

#[derive(Serialize)]
struct Billing<'a> {
    address_1: &'a str,
    city: &'a str,
    country: &'a str,
}

#[async_trait]
impl PaymentProcessor for VerifoneClient {
    async fn create_auth_token(&self) -> std::result::Result<String, TokenError> {
        let url = self.config.endpoint(TOKEN_PATH);
        let body = TokenBody {
            threeds_contract_id: &self.config.threeds_contract_id,
        };

        let response = self.post(&url, &body).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "request to processor failed");
            TokenError::Request
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "processor rejected 3-D Secure token request");
            return Err(TokenError::Response);
        }

        match read_body::<TokenResponse>(response).await {
            Ok(token) => Ok(token.jwt),
            Err(BodyFailure::Shape(e)) => {
                warn!(url = %url, error = %e, "parsing response body from processor failed");
                Err(TokenError::BodyParse)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "reading response body from processor failed");
                Err(TokenError::Request)
            }
        }
    }

    async fn lookup_3ds(
        &self,
        request: LookupRequest,
    ) -> std::result::Result<ThreeDSLookupResult, LookupError> {
        let url = self.config.endpoint(LOOKUP_PATH);
        let cardholder = &request.cardholder;
        let body = LookupBody {
            amount: request.amount,
            billing_first_name: &cardholder.first_name,
            billing_last_name: &cardholder.last_name,
            billing_address_1: &cardholder.address_1,
            billing_city: &cardholder.city,
            billing_country_code: &cardholder.country,
            email: &cardholder.email,
            encrypted_card: &request.encrypted_card,
            public_key_alias: &self.config.key_alias,
            currency_code: &self.config.contract_currency,
            device_info_id: &request.device_info_id,
            merchant_reference: &request.merchant_reference,
            threeds_contract_id: &self.config.threeds_contract_id,
        };

        let response = self.post(&url, &body).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "request to processor failed");
            LookupError::Request
        })?;

        // The status code is not consulted here; an error answer that still
        // matches the lookup schema is judged by the liability rules.
        let status = response.status();
        match read_body::<ThreeDSLookupResult>(response).await {
            Ok(result) => {
                debug!(url = %url, status = %status, "3-D Secure lookup answered");
                Ok(result)
            }
            Err(BodyFailure::Shape(e)) => {
                warn!(url = %url, error = %e, "parsing response body from processor failed");
                Err(LookupError::BodyParse)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "lexing response body from processor failed");
                Err(LookupError::Decode)
            }
        }
    }

    async fn submit_payment(
        &self,
        request: ChargeRequest,
    ) -> std::result::Result<PaymentResult, ChargeError> {
        let url = self.config.endpoint(CARD_TRANSACTION_PATH);
        let cardholder = &request.cardholder;
        let body = ChargeBody {
            payment_provider_contract: &self.config.ppc_id,
            amount: request.amount,
            merchant_reference: &request.merchant_reference,
            threed_authentication: &request.evidence,
            customer_details: CustomerDetails {
                first_name: &cardholder.first_name,
                last_name: &cardholder.last_name,
                email_address: &cardholder.email,
                billing: Billing {
                    address_1: &cardholder.address_1,
                    city: &cardholder.city,
                    country: &cardholder.country,
                },
            },
            currency_code: &self.config.contract_currency,
            encrypted_card: &request.encrypted_card,
            public_key_alias: &self.config.key_alias,
        };

        let response = self.post(&url, &body).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "request to processor failed");
            ChargeError::Request
        })?;

        let status = response.status();
        match read_body::<PaymentResult>(response).await {
            Ok(result) => {
                debug!(
                    url = %url,
                    status = %status,
                    payment_status = ?result.status,
                    "card payment answered"
                );
                Ok(result)
            }
            Err(BodyFailure::Shape(e)) => {
                warn!(url = %url, error = %e, "parsing response body from processor failed");
                Err(ChargeError::BodyParse)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "lexing response body from processor failed");
                Err(ChargeError::Decode)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[derive(Serialize)]
    struct Amount {
        #[serde(serialize_with = "serialize_amount")]
        amount: Decimal,
    }

    #[test]
    fn test_whole_amount_is_integer() {
        let json = serde_json::to_string(&Amount { amount: dec!(10) }).unwrap();
        assert_eq!(json, r#"{"amount":10}"#);
    }

    #[test]
    fn test_fractional_amount_is_float() {
        let json = serde_json::to_string(&Amount { amount: dec!(10.5) }).unwrap();
        assert_eq!(json, r#"{"amount":10.5}"#);
    }

    #[test]
    fn test_charge_body_shape() {
        let evidence = ThreeDSEvidence {
            eci_flag: "05".to_string(),
            enrolled: "Y".to_string(),
            cavv: "CAVV".to_string(),
            pares_status: "Y".to_string(),
            threeds_version: "2.2.0".to_string(),
            ds_transaction_id: "ds-1".to_string(),
            signature_verification: "Y".to_string(),
            error_desc: String::new(),
            error_no: "0".to_string(),
        };
        let body = ChargeBody {
            payment_provider_contract: "ppc-1",
            amount: dec!(10),
            merchant_reference: "order-1",
            threed_authentication: &evidence,
            customer_details: CustomerDetails {
                first_name: "Jon",
                last_name: "Jonsson",
                email_address: "jon@example.is",
                billing: Billing {
                    address_1: "Laugavegur 1",
                    city: "Reykjavik",
                    country: "IS",
                },
            },
            currency_code: "ISK",
            encrypted_card: "ENCRYPTED",
            public_key_alias: "KEY-ALIAS",
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["threed_authentication"]["cavv"], "CAVV");
        assert_eq!(json["customer_details"]["billing"]["city"], "Reykjavik");
        assert_eq!(json["payment_provider_contract"], "ppc-1");
        assert_eq!(json["amount"], 10);
    }
}
