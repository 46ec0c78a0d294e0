use serde::{Deserialize, Serialize};

/// Response body of the processor's 3DS lookup.
///
/// Every field is optional on the wire. Unknown fields are ignored, but a
/// known field holding anything other than a string or `null` is a schema
/// violation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThreeDSLookupResult {
    pub enrolled: Option<String>,
    pub signature_verification: Option<String>,
    pub pares_status: Option<String>,
    pub eci_flag: Option<String>,
    pub cavv: Option<String>,
    pub threeds_version: Option<String>,
    pub ds_transaction_id: Option<String>,
    pub acs_url: Option<String>,
    pub payload: Option<String>,
    pub transaction_id: Option<String>,
    pub error_no: Option<String>,
    pub error_desc: Option<String>,
}

/// Who carries chargeback liability after a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiabilityVerdict {
    IssuerNotEnrolled,
    SignatureInvalid,
    /// The cardholder must complete a step-up challenge in the browser.
    CardholderVerification,
    /// The issuer carries liability; the charge may proceed.
    LiabilityShifted,
    Unknown,
}

fn eq_ci(value: Option<&str>, expected: &str) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case(expected))
}

fn in_ci(value: Option<&str>, expected: &[&str]) -> bool {
    value.is_some_and(|v| expected.iter().any(|e| v.eq_ignore_ascii_case(e)))
}

/// Maps a lookup result to a liability verdict. The first matching rule wins
/// and the order of the rules is significant.
pub fn calculate_liability(lookup: &ThreeDSLookupResult) -> LiabilityVerdict {
    let enrolled = lookup.enrolled.as_deref();
    let signature = lookup.signature_verification.as_deref();
    let pares = lookup.pares_status.as_deref();

    if enrolled.is_none() || in_ci(enrolled, &["N", "U", "B"]) {
        return LiabilityVerdict::IssuerNotEnrolled;
    }

    if !eq_ci(signature, "Y") {
        return LiabilityVerdict::SignatureInvalid;
    }

    let precondition = eq_ci(signature, "Y") && eq_ci(enrolled, "Y");

    if precondition && eq_ci(pares, "C") {
        return LiabilityVerdict::CardholderVerification;
    }

    if precondition && in_ci(pares, &["Y", "A"]) {
        return LiabilityVerdict::LiabilityShifted;
    }

    LiabilityVerdict::Unknown
}

/// Fields the browser needs to run the step-up challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepUpChallenge {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrolled: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ds_transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acs_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

/// Authentication evidence the browser echoes back to `/Payment/SecuredCard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticationOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eci_flag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrolled: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cavv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pares_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threeds_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ds_transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_verification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_no: Option<String>,
}

impl ThreeDSLookupResult {
    pub fn step_up_challenge(&self) -> StepUpChallenge {
        StepUpChallenge {
            enrolled: self.enrolled.clone(),
            ds_transaction_id: self.ds_transaction_id.clone(),
            acs_url: self.acs_url.clone(),
            payload: self.payload.clone(),
            transaction_id: self.transaction_id.clone(),
        }
    }

    pub fn authentication_outcome(&self) -> AuthenticationOutcome {
        AuthenticationOutcome {
            eci_flag: self.eci_flag.clone(),
            enrolled: self.enrolled.clone(),
            cavv: self.cavv.clone(),
            pares_status: self.pares_status.clone(),
            threeds_version: self.threeds_version.clone(),
            ds_transaction_id: self.ds_transaction_id.clone(),
            signature_verification: self.signature_verification.clone(),
            error_desc: self.error_desc.clone(),
            error_no: self.error_no.clone(),
        }
    }
}

/// The complete 3DS evidence bundle attached to a card charge.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThreeDSEvidence {
    pub eci_flag: String,
    pub enrolled: String,
    pub cavv: String,
    pub pares_status: String,
    pub threeds_version: String,
    pub ds_transaction_id: String,
    pub signature_verification: String,
    pub error_desc: String,
    pub error_no: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(
        enrolled: Option<&str>,
        signature: Option<&str>,
        pares: Option<&str>,
    ) -> ThreeDSLookupResult {
        ThreeDSLookupResult {
            enrolled: enrolled.map(String::from),
            signature_verification: signature.map(String::from),
            pares_status: pares.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_not_enrolled_wins_over_everything() {
        for enrolled in [None, Some("N"), Some("n"), Some("U"), Some("u"), Some("B"), Some("b")] {
            for signature in [None, Some("Y"), Some("N")] {
                for pares in [None, Some("Y"), Some("C"), Some("A")] {
                    assert_eq!(
                        calculate_liability(&lookup(enrolled, signature, pares)),
                        LiabilityVerdict::IssuerNotEnrolled,
                        "enrolled={enrolled:?} signature={signature:?} pares={pares:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_signature_not_yes_is_invalid() {
        for signature in [None, Some("N"), Some("n"), Some(""), Some("X"), Some("YES")] {
            assert_eq!(
                calculate_liability(&lookup(Some("Y"), signature, Some("Y"))),
                LiabilityVerdict::SignatureInvalid,
                "signature={signature:?}"
            );
        }
    }

    #[test]
    fn test_challenge_required() {
        assert_eq!(
            calculate_liability(&lookup(Some("Y"), Some("Y"), Some("C"))),
            LiabilityVerdict::CardholderVerification
        );
        assert_eq!(
            calculate_liability(&lookup(Some("y"), Some("y"), Some("c"))),
            LiabilityVerdict::CardholderVerification
        );
    }

    #[test]
    fn test_liability_shifted() {
        for pares in ["Y", "y", "A", "a"] {
            assert_eq!(
                calculate_liability(&lookup(Some("Y"), Some("Y"), Some(pares))),
                LiabilityVerdict::LiabilityShifted,
                "pares={pares}"
            );
        }
    }

    #[test]
    fn test_unrecognised_pares_is_unknown() {
        assert_eq!(
            calculate_liability(&lookup(Some("Y"), Some("Y"), Some("Z"))),
            LiabilityVerdict::Unknown
        );
        assert_eq!(
            calculate_liability(&lookup(Some("Y"), Some("Y"), None)),
            LiabilityVerdict::Unknown
        );
    }

    #[test]
    fn test_unexpected_enrollment_value_is_unknown() {
        // Enrollment that is neither a rejection code nor "Y" fails the precondition.
        assert_eq!(
            calculate_liability(&lookup(Some("X"), Some("Y"), Some("Y"))),
            LiabilityVerdict::Unknown
        );
    }

    #[test]
    fn test_lookup_schema_rejects_wrong_types() {
        let ok: ThreeDSLookupResult =
            serde_json::from_str(r#"{"enrolled":"Y","extra":42,"cavv":null}"#).unwrap();
        assert_eq!(ok.enrolled.as_deref(), Some("Y"));
        assert_eq!(ok.cavv, None);

        let bad = serde_json::from_str::<ThreeDSLookupResult>(r#"{"enrolled":1}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_step_up_challenge_omits_absent_fields() {
        let result = ThreeDSLookupResult {
            enrolled: Some("Y".to_string()),
            acs_url: Some("https://acs.example/challenge".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(result.step_up_challenge()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"enrolled": "Y", "acs_url": "https://acs.example/challenge"})
        );
    }
}
