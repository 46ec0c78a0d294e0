//! Browser submissions and the rules they must satisfy.
//!
//! Bodies are first read into `Raw*` shapes where every field is optional, so
//! that a missing field is reported next to every other broken rule instead of
//! aborting on the first one. Validated submissions are then built with
//! `TryFrom`, and can only exist if every rule held.

use super::payment::{Cardholder, ChargeRequest, LookupRequest};
use super::threeds::ThreeDSEvidence;
use crate::error::{FieldViolation, SubmissionError, validation_reason};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

const MISSING_LAST_NAME: &str = "Undefined";

/// Splits a cardholder name into first and last name on the first space.
///
/// A name without a last part, including one that ends in a space, gets the
/// placeholder last name the processor expects.
pub fn split_name(name: &str) -> (String, String) {
    match name.split_once(' ') {
        Some((first, last)) if !last.trim().is_empty() => (first.to_string(), last.to_string()),
        Some((first, _)) => (first.to_string(), MISSING_LAST_NAME.to_string()),
        None => (name.to_string(), MISSING_LAST_NAME.to_string()),
    }
}

const CARDHOLDER_FIELDS: [&str; 5] = [
    "cardholder_name",
    "cardholder_email",
    "cardholder_address_1",
    "cardholder_locality",
    "cardholder_country",
];

const CARD_FIELDS: [&str; 3] = ["device_info_id", "encrypted_card", "merchant_reference"];

const SECURED_CARD_FIELDS: [&str; 11] = [
    "encrypted_card",
    "merchant_reference",
    "eci_flag",
    "enrolled",
    "cavv",
    "pares_status",
    "threeds_version",
    "ds_transaction_id",
    "signature_verification",
    "error_desc",
    "error_no",
];

/// Turns validator output into violations listed in body field order.
fn violations(errors: &ValidationErrors, extra_fields: &[&'static str]) -> SubmissionError {
    let order: Vec<&'static str> = CARDHOLDER_FIELDS
        .iter()
        .chain(extra_fields)
        .copied()
        .collect();

    let mut found: Vec<(usize, FieldViolation)> = Vec::new();
    for (field, errors) in errors.field_errors() {
        let field: &str = &field;
        let Some(position) = order.iter().position(|name| *name == field) else {
            continue;
        };
        for error in errors {
            found.push((
                position,
                FieldViolation {
                    field: order[position],
                    reason: validation_reason(error),
                },
            ));
        }
    }
    found.sort_by_key(|(position, _)| *position);

    SubmissionError::Invalid(found.into_iter().map(|(_, violation)| violation).collect())
}

/// Body of `POST /Payment/3DSecureLookup` as received.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RawCardSubmission {
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(min = 1, message = "Too small: expected string to have >=1 characters")
    )]
    pub cardholder_name: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        email(message = "Invalid email address")
    )]
    pub cardholder_email: Option<String>,
    #[validate(required(message = "Invalid input: expected string, received undefined"))]
    pub cardholder_address_1: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(min = 1, message = "Too small: expected string to have >=1 characters")
    )]
    pub cardholder_locality: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(
            equal = 2,
            message = "Invalid length: expected string to have exactly 2 characters"
        )
    )]
    pub cardholder_country: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(min = 1, message = "Too small: expected string to have >=1 characters")
    )]
    pub device_info_id: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(min = 1, message = "Too small: expected string to have >=1 characters")
    )]
    pub encrypted_card: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(min = 1, message = "Too small: expected string to have >=1 characters")
    )]
    pub merchant_reference: Option<String>,
}

/// Body of `POST /Payment/SecuredCard` as received.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RawSecuredCardSubmission {
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(min = 1, message = "Too small: expected string to have >=1 characters")
    )]
    pub cardholder_name: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        email(message = "Invalid email address")
    )]
    pub cardholder_email: Option<String>,
    #[validate(required(message = "Invalid input: expected string, received undefined"))]
    pub cardholder_address_1: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(min = 1, message = "Too small: expected string to have >=1 characters")
    )]
    pub cardholder_locality: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(
            equal = 2,
            message = "Invalid length: expected string to have exactly 2 characters"
        )
    )]
    pub cardholder_country: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(min = 1, message = "Too small: expected string to have >=1 characters")
    )]
    pub encrypted_card: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(min = 1, message = "Too small: expected string to have >=1 characters")
    )]
    pub merchant_reference: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(min = 1, message = "Too small: expected string to have >=1 characters")
    )]
    pub eci_flag: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(min = 1, message = "Too small: expected string to have >=1 characters")
    )]
    pub enrolled: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(min = 1, message = "Too small: expected string to have >=1 characters")
    )]
    pub cavv: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(min = 1, message = "Too small: expected string to have >=1 characters")
    )]
    pub pares_status: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(min = 1, message = "Too small: expected string to have >=1 characters")
    )]
    pub threeds_version: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(min = 1, message = "Too small: expected string to have >=1 characters")
    )]
    pub ds_transaction_id: Option<String>,
    #[validate(
        required(message = "Invalid input: expected string, received undefined"),
        length(min = 1, message = "Too small: expected string to have >=1 characters")
    )]
    pub signature_verification: Option<String>,
    #[validate(required(message = "Invalid input: expected string, received undefined"))]
    pub error_desc: Option<String>,
    #[validate(required(message = "Invalid input: expected string, received undefined"))]
    pub error_no: Option<String>,
}

/// Cardholder fields shared by both submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardholderDetails {
    pub name: String,
    pub email: String,
    pub address_1: String,
    pub locality: String,
    pub country: String,
}

impl CardholderDetails {
    pub fn to_cardholder(&self) -> Cardholder {
        let (first_name, last_name) = split_name(&self.name);
        Cardholder {
            first_name,
            last_name,
            email: self.email.clone(),
            address_1: self.address_1.clone(),
            city: self.locality.clone(),
            country: self.country.clone(),
        }
    }
}

/// A card submission that passed validation, ready for a 3DS lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSubmission {
    pub cardholder: CardholderDetails,
    pub device_info_id: String,
    pub encrypted_card: String,
    pub merchant_reference: String,
}

impl TryFrom<RawCardSubmission> for CardSubmission {
    type Error = SubmissionError;

    fn try_from(raw: RawCardSubmission) -> Result<Self, Self::Error> {
        raw.validate()
            .map_err(|errors| violations(&errors, &CARD_FIELDS))?;

        // Presence of every field was checked above.
        Ok(Self {
            cardholder: CardholderDetails {
                name: raw.cardholder_name.unwrap_or_default(),
                email: raw.cardholder_email.unwrap_or_default(),
                address_1: raw.cardholder_address_1.unwrap_or_default(),
                locality: raw.cardholder_locality.unwrap_or_default(),
                country: raw.cardholder_country.unwrap_or_default(),
            },
            device_info_id: raw.device_info_id.unwrap_or_default(),
            encrypted_card: raw.encrypted_card.unwrap_or_default(),
            merchant_reference: raw.merchant_reference.unwrap_or_default(),
        })
    }
}

impl CardSubmission {
    pub fn into_lookup_request(self, amount: Decimal) -> LookupRequest {
        LookupRequest {
            amount,
            cardholder: self.cardholder.to_cardholder(),
            encrypted_card: self.encrypted_card,
            device_info_id: self.device_info_id,
            merchant_reference: self.merchant_reference,
        }
    }
}

/// A card submission carrying 3DS evidence, ready to be charged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecuredCardSubmission {
    pub cardholder: CardholderDetails,
    pub encrypted_card: String,
    pub merchant_reference: String,
    pub evidence: ThreeDSEvidence,
}

impl TryFrom<RawSecuredCardSubmission> for SecuredCardSubmission {
    type Error = SubmissionError;

    fn try_from(raw: RawSecuredCardSubmission) -> Result<Self, Self::Error> {
        raw.validate()
            .map_err(|errors| violations(&errors, &SECURED_CARD_FIELDS))?;

        // Presence of every field was checked above.
        Ok(Self {
            cardholder: CardholderDetails {
                name: raw.cardholder_name.unwrap_or_default(),
                email: raw.cardholder_email.unwrap_or_default(),
                address_1: raw.cardholder_address_1.unwrap_or_default(),
                locality: raw.cardholder_locality.unwrap_or_default(),
                country: raw.cardholder_country.unwrap_or_default(),
            },
            encrypted_card: raw.encrypted_card.unwrap_or_default(),
            merchant_reference: raw.merchant_reference.unwrap_or_default(),
            evidence: ThreeDSEvidence {
                eci_flag: raw.eci_flag.unwrap_or_default(),
                enrolled: raw.enrolled.unwrap_or_default(),
                cavv: raw.cavv.unwrap_or_default(),
                pares_status: raw.pares_status.unwrap_or_default(),
                threeds_version: raw.threeds_version.unwrap_or_default(),
                ds_transaction_id: raw.ds_transaction_id.unwrap_or_default(),
                signature_verification: raw.signature_verification.unwrap_or_default(),
                error_desc: raw.error_desc.unwrap_or_default(),
                error_no: raw.error_no.unwrap_or_default(),
            },
        })
    }
}

impl SecuredCardSubmission {
    pub fn into_charge_request(self, amount: Decimal) -> ChargeRequest {
        ChargeRequest {
            amount,
            cardholder: self.cardholder.to_cardholder(),
            encrypted_card: self.encrypted_card,
            merchant_reference: self.merchant_reference,
            evidence: self.evidence,
        }
    }
}
