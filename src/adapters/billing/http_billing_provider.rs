//! Billing provider adapter over the provider's JSON HTTP API.
//!
//! - `POST /v1/checkouts` opens a hosted checkout with our metadata attached
//! - `DELETE /v1/subscriptions/{id}` revokes a subscription immediately
//!
//! Every request carries a client-level timeout; a timeout is reported as a
//! failure, never as success.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
};

/// Billing API configuration.
#[derive(Clone)]
pub struct BillingApiConfig {
    api_key: SecretString,
    api_base_url: String,
    timeout: Duration,
}

impl BillingApiConfig {
    pub fn new(api_key: SecretString, api_base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct CheckoutBody<'a> {
    product_id: &'a str,
    success_url: &'a str,
    customer_email: &'a str,
    metadata: CheckoutMetadata<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutMetadata<'a> {
    user_id: String,
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct CheckoutResponse {
    id: String,
    url: String,
}

/// HTTP billing provider adapter.
pub struct HttpBillingProvider {
    config: BillingApiConfig,
    http_client: reqwest::Client,
}

impl HttpBillingProvider {
    pub fn new(config: BillingApiConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::network(e.to_string()))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }
}

fn map_send_error(err: reqwest::Error) -> PaymentError {
    if err.is_timeout() {
        PaymentError::timeout()
    } else {
        PaymentError::network(err.to_string())
    }
}

async fn map_status_error(response: reqwest::Response) -> PaymentError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let code = match status.as_u16() {
        401 | 403 => PaymentErrorCode::AuthenticationError,
        404 => PaymentErrorCode::NotFound,
        422 | 400 => PaymentErrorCode::InvalidRequest,
        429 => PaymentErrorCode::RateLimited,
        _ => PaymentErrorCode::ProviderError,
    };
    PaymentError::new(code, format!("Billing API error: {}", body))
        .with_provider_code(status.as_u16().to_string())
}

#[async_trait]
impl PaymentProvider for HttpBillingProvider {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let body = CheckoutBody {
            product_id: &request.product_id,
            success_url: &request.success_url,
            customer_email: &request.email,
            metadata: CheckoutMetadata {
                user_id: request.user_id.to_string(),
                email: &request.email,
            },
        };

        let response = self
            .http_client
            .post(self.url("/v1/checkouts"))
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(map_status_error(response).await);
        }

        let checkout: CheckoutResponse = response.json().await.map_err(|e| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Failed to parse billing response: {}", e),
            )
        })?;

        Ok(CheckoutSession {
            id: checkout.id,
            url: checkout.url,
        })
    }

    async fn revoke_subscription(&self, subscription_id: &str) -> Result<(), PaymentError> {
        let response = self
            .http_client
            .delete(self.url(&format!("/v1/subscriptions/{}", subscription_id)))
            .bearer_auth(self.config.api_key.expose_secret())
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(map_status_error(response).await);
        }
        Ok(())
    }
}
