use crate::domain::payment::{ChargeRequest, LookupRequest, PaymentResult, PaymentStatus};
use crate::domain::ports::PaymentProcessor;
use crate::domain::threeds::ThreeDSLookupResult;
use crate::error::{ChargeError, LookupError, TokenError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A processor that answers every call with a pre-scripted outcome.
///
/// Requests are recorded in `Arc<RwLock<Vec<_>>>` so a clone kept by the
/// caller can inspect what reached the processor after the original has been
/// handed over to a service. Used to drive the HTTP flows without a network.
#[derive(Clone)]
pub struct ScriptedProcessor {
    token: Result<String, TokenError>,
    lookup: Result<ThreeDSLookupResult, LookupError>,
    payment: Result<PaymentResult, ChargeError>,
    lookups: Arc<RwLock<Vec<LookupRequest>>>,
    charges: Arc<RwLock<Vec<ChargeRequest>>>,
}

impl Default for ScriptedProcessor {
    fn default() -> Self {
        Self {
            token: Ok("scripted-jwt".to_string()),
            lookup: Ok(ThreeDSLookupResult::default()),
            payment: Ok(PaymentResult {
                id: None,
                status: PaymentStatus::Authorized,
            }),
            lookups: Arc::default(),
            charges: Arc::default(),
        }
    }
}

impl ScriptedProcessor {
    /// Creates a processor that issues a token, reports the card as not
    /// enrolled, and authorizes every payment.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: Result<String, TokenError>) -> Self {
        self.token = token;
        self
    }

    pub fn with_lookup(mut self, lookup: Result<ThreeDSLookupResult, LookupError>) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_payment(mut self, payment: Result<PaymentResult, ChargeError>) -> Self {
        self.payment = payment;
        self
    }

    /// Lookup requests received so far, oldest first.
    pub async fn lookups(&self) -> Vec<LookupRequest> {
        self.lookups.read().await.clone()
    }

    /// Charge requests received so far, oldest first.
    pub async fn charges(&self) -> Vec<ChargeRequest> {
        self.charges.read().await.clone()
    }
}

#[async_trait]
impl PaymentProcessor for ScriptedProcessor {
    async fn create_auth_token(&self) -> Result<String, TokenError> {
        self.token.clone()
    }

    async fn lookup_3ds(&self, request: LookupRequest) -> Result<ThreeDSLookupResult, LookupError> {
        self.lookups.write().await.push(request);
        self.lookup.clone()
    }

    async fn submit_payment(&self, request: ChargeRequest) -> Result<PaymentResult, ChargeError> {
        self.charges.write().await.push(request);
        self.payment.clone()
    }
}
