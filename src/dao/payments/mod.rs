/// Stripe REST gateway.
#[cfg(feature = "stripe")]
pub mod stripe;

use futures::future::BoxFuture;
use thiserror::Error;

/// Parameters of a payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentRequest {
    /// Amount in the currency's minor unit (cents for USD).
    pub amount: u64,
    /// Three-letter ISO currency code, lowercase.
    pub currency: String,
    /// Statement description.
    pub description: String,
}

/// Failures reported by a payment provider.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Provider could not be reached or returned garbage.
    #[error("payment provider unreachable: {0}")]
    Unreachable(String),
    /// Provider refused the request; the message is meant for the end user.
    #[error("{0}")]
    Declined(String),
}

/// Payment provider able to open a payment intent.
pub trait PaymentGateway: Send + Sync {
    /// Create the intent and return the client confirmation secret.
    fn create_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> BoxFuture<'static, Result<String, PaymentError>>;
}
