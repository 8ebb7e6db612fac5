//! Mock payment provider for tests and local development.
//!
//! Supports error injection, artificial latency, and call tracking.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::ports::{CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider};

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    CreateCheckout { user_id: String, email: String },
    Revoke { subscription_id: String },
}

#[derive(Default)]
struct MockState {
    checkout_error: Option<PaymentError>,
    revoke_error: Option<PaymentError>,
    latency: Option<Duration>,
    calls: Vec<ProviderCall>,
}

/// Mock payment provider.
#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `revoke_subscription` call fails with `error`.
    pub fn failing_revoke(error: PaymentError) -> Self {
        let mock = Self::new();
        mock.set_revoke_error(Some(error));
        mock
    }

    /// Every `create_checkout_session` call fails with `error`.
    pub fn failing_checkout(error: PaymentError) -> Self {
        let mock = Self::new();
        if let Ok(mut state) = mock.inner.lock() {
            state.checkout_error = Some(error);
        }
        mock
    }

    pub fn set_revoke_error(&self, error: Option<PaymentError>) {
        if let Ok(mut state) = self.inner.lock() {
            state.revoke_error = error;
        }
    }

    /// Delays every call, to exercise caller timeouts.
    pub fn with_latency(self, latency: Duration) -> Self {
        if let Ok(mut state) = self.inner.lock() {
            state.latency = Some(latency);
        }
        self
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.inner
            .lock()
            .map(|state| state.calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, call: ProviderCall) -> (Option<Duration>, Option<PaymentError>) {
        let Ok(mut state) = self.inner.lock() else {
            return (None, Some(PaymentError::provider("mock state poisoned")));
        };
        let error = match &call {
            ProviderCall::CreateCheckout { .. } => state.checkout_error.clone(),
            ProviderCall::Revoke { .. } => state.revoke_error.clone(),
        };
        state.calls.push(call);
        (state.latency, error)
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let (latency, error) = self.record(ProviderCall::CreateCheckout {
            user_id: request.user_id.to_string(),
            email: request.email.clone(),
        });
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(error) = error {
            return Err(error);
        }

        let id = format!("co_{}", request.user_id.as_uuid().simple());
        Ok(CheckoutSession {
            url: format!("https://checkout.example.com/{}", id),
            id,
        })
    }

    async fn revoke_subscription(&self, subscription_id: &str) -> Result<(), PaymentError> {
        let (latency, error) = self.record(ProviderCall::Revoke {
            subscription_id: subscription_id.to_string(),
        });
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
