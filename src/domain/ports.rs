use super::payment::{ChargeRequest, LookupRequest, PaymentResult};
use super::threeds::ThreeDSLookupResult;
use crate::error::{ChargeError, LookupError, TokenError};
use async_trait::async_trait;

/// The three calls this service makes to the card processor.
///
/// Every call is attempted exactly once. Implementations classify failures into
/// the closed per-operation error kinds instead of surfacing transport errors.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Obtains the token the browser-side 3DS widget is initialised with.
    async fn create_auth_token(&self) -> Result<String, TokenError>;
    async fn lookup_3ds(&self, request: LookupRequest) -> Result<ThreeDSLookupResult, LookupError>;
    async fn submit_payment(&self, request: ChargeRequest) -> Result<PaymentResult, ChargeError>;
}

pub type PaymentProcessorBox = Box<dyn PaymentProcessor>;
