use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Client;
use serde::Deserialize;

use super::{PaymentError, PaymentGateway, PaymentIntentRequest};

const DEFAULT_API_BASE: &str = "https://api.stripe.com";

/// [`PaymentGateway`] talking to the Stripe REST API.
#[derive(Clone)]
pub struct StripeGateway {
    client: Client,
    api_base: Arc<str>,
    secret_key: Arc<str>,
}

#[derive(Debug, Deserialize)]
struct PaymentIntentResponse {
    client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
}

impl StripeGateway {
    /// Build a gateway using the given secret key.
    pub fn new(secret_key: impl Into<String>) -> Result<Self, PaymentError> {
        let client = Client::builder()
            .build()
            .map_err(|err| PaymentError::Unreachable(err.to_string()))?;
        Ok(Self {
            client,
            api_base: Arc::from(DEFAULT_API_BASE),
            secret_key: Arc::from(secret_key.into()),
        })
    }

    /// Build a gateway from `STRIPE_SECRET_KEY`; `None` when the variable is missing or empty.
    pub fn from_env() -> Option<Result<Self, PaymentError>> {
        std::env::var("STRIPE_SECRET_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(Self::new)
    }
}

impl PaymentGateway for StripeGateway {
    fn create_intent(
        &self,
        request: PaymentIntentRequest,
    ) -> BoxFuture<'static, Result<String, PaymentError>> {
        let gateway = self.clone();
        Box::pin(async move {
            let url = format!("{}/v1/payment_intents", gateway.api_base);
            let form = [
                ("amount", request.amount.to_string()),
                ("currency", request.currency),
                ("description", request.description),
                ("automatic_payment_methods[enabled]", "true".to_string()),
            ];

            let response = gateway
                .client
                .post(url)
                .bearer_auth(gateway.secret_key.as_ref())
                .form(&form)
                .send()
                .await
                .map_err(|err| PaymentError::Unreachable(err.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let message = response
                    .json::<StripeErrorResponse>()
                    .await
                    .ok()
                    .and_then(|body| body.error.message)
                    .unwrap_or_else(|| format!("payment provider returned {status}"));
                return Err(PaymentError::Declined(message));
            }

            let body = response
                .json::<PaymentIntentResponse>()
                .await
                .map_err(|err| PaymentError::Unreachable(err.to_string()))?;
            body.client_secret.ok_or_else(|| {
                PaymentError::Unreachable("payment intent has no client secret".into())
            })
        })
    }
}
