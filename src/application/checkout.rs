use crate::config::ProcessorConfig;
use crate::domain::payment::PaymentResult;
use crate::domain::ports::PaymentProcessorBox;
use crate::domain::submission::{CardSubmission, SecuredCardSubmission};
use crate::domain::threeds::{
    AuthenticationOutcome, LiabilityVerdict, StepUpChallenge, calculate_liability,
};
use crate::error::{ChargeError, LookupError, TokenError};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Everything the payment form needs to start a checkout in the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    /// Token the 3DS widget is initialised with.
    pub token: String,
    /// Opaque per-page identifier, a UUID without hyphens.
    pub checkout_id: String,
    pub public_key: String,
    /// Processor scripts the page must load, in order.
    pub scripts: Vec<String>,
}

/// Result of a 3DS lookup once the liability rules have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    IssuerNotEnrolled,
    SignatureInvalid,
    /// The browser must run the issuer challenge before paying.
    ChallengeRequired(StepUpChallenge),
    /// The charge may proceed with this evidence.
    LiabilityShifted(AuthenticationOutcome),
    LiabilityUnknown,
}

/// Runs the token → lookup → payment protocol against a processor.
///
/// Holds no per-checkout state: the browser carries the lookup evidence from
/// one call to the next.
pub struct CheckoutService {
    processor: PaymentProcessorBox,
    config: Arc<ProcessorConfig>,
}

impl CheckoutService {
    pub fn new(processor: PaymentProcessorBox, config: Arc<ProcessorConfig>) -> Self {
        Self { processor, config }
    }

    /// Obtains a 3DS token and opens a new checkout.
    pub async fn start(&self) -> Result<CheckoutSession, TokenError> {
        let token = self.processor.create_auth_token().await?;
        let checkout_id = Uuid::new_v4().simple().to_string();
        debug!(checkout_id = %checkout_id, "checkout started");

        Ok(CheckoutSession {
            token,
            checkout_id,
            public_key: self.config.public_key.clone(),
            scripts: vec![
                self.config.verifone_js_url.clone(),
                self.config.songbird_js_url.clone(),
            ],
        })
    }

    /// Runs the 3DS lookup for a card and decides who carries liability.
    pub async fn lookup(&self, submission: CardSubmission) -> Result<LookupOutcome, LookupError> {
        let reference = submission.merchant_reference.clone();
        let request = submission.into_lookup_request(self.config.amount);
        let result = self.processor.lookup_3ds(request).await?;

        let verdict = calculate_liability(&result);
        info!(merchant_reference = %reference, verdict = ?verdict, "3-D Secure lookup evaluated");

        Ok(match verdict {
            LiabilityVerdict::IssuerNotEnrolled => LookupOutcome::IssuerNotEnrolled,
            LiabilityVerdict::SignatureInvalid => LookupOutcome::SignatureInvalid,
            LiabilityVerdict::CardholderVerification => {
                LookupOutcome::ChallengeRequired(result.step_up_challenge())
            }
            LiabilityVerdict::LiabilityShifted => {
                LookupOutcome::LiabilityShifted(result.authentication_outcome())
            }
            LiabilityVerdict::Unknown => LookupOutcome::LiabilityUnknown,
        })
    }

    /// Charges the card with the 3DS evidence the browser echoed back.
    pub async fn pay(
        &self,
        submission: SecuredCardSubmission,
    ) -> Result<PaymentResult, ChargeError> {
        let reference = submission.merchant_reference.clone();
        let request = submission.into_charge_request(self.config.amount);
        let result = self.processor.submit_payment(request).await?;
        info!(merchant_reference = %reference, status = ?result.status, "card payment submitted");
        Ok(result)
    }
}
