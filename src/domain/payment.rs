use super::threeds::ThreeDSEvidence;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Billing identity of the person paying, as sent to the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cardholder {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address_1: String,
    pub city: String,
    /// Two-letter country code.
    pub country: String,
}

/// Input of a 3DS lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupRequest {
    pub amount: Decimal,
    pub cardholder: Cardholder,
    /// Card blob encrypted in the browser by the processor's script.
    pub encrypted_card: String,
    pub device_info_id: String,
    pub merchant_reference: String,
}

/// Input of a card charge carrying the evidence of a completed 3DS lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ChargeRequest {
    pub amount: Decimal,
    pub cardholder: Cardholder,
    pub encrypted_card: String,
    pub merchant_reference: String,
    pub evidence: ThreeDSEvidence,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Authorized,
    Pending,
    Declined,
    Unknown,
    /// Any status this service has no dedicated handling for.
    Other(String),
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "AUTHORIZED" => Self::Authorized,
            "PENDING" => Self::Pending,
            "DECLINED" => Self::Declined,
            "UNKNOWN" => Self::Unknown,
            _ => Self::Other(value),
        }
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Authorized => "AUTHORIZED".to_string(),
            PaymentStatus::Pending => "PENDING".to_string(),
            PaymentStatus::Declined => "DECLINED".to_string(),
            PaymentStatus::Unknown => "UNKNOWN".to_string(),
            PaymentStatus::Other(other) => other,
        }
    }
}

/// Response body of the processor's card transaction endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PaymentResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub status: PaymentStatus,
}
