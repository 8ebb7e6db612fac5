//! CreateCheckoutHandler - starts a paid-plan checkout for the caller.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::UserId;
use crate::ports::{CreateCheckoutRequest, PaymentError, PaymentProvider, UserRepository};

/// Command to create a checkout session.
#[derive(Debug, Clone)]
pub struct CreateCheckoutCommand {
    pub user_id: UserId,
}

/// Result of checkout creation.
#[derive(Debug, Clone)]
pub struct CreateCheckoutResult {
    pub checkout_url: String,
}

/// Product and redirect used for every checkout.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub product_id: String,
    pub success_url: String,
    pub timeout: Duration,
}

/// Handler for checkout creation.
///
/// The user's id and email are attached as checkout metadata; the provider
/// echoes them back in subscription webhooks, which is how those events are
/// routed to the right account.
pub struct CreateCheckoutHandler {
    users: Arc<dyn UserRepository>,
    payments: Arc<dyn PaymentProvider>,
    settings: CheckoutSettings,
}

impl CreateCheckoutHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        payments: Arc<dyn PaymentProvider>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            users,
            payments,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutCommand,
    ) -> Result<CreateCheckoutResult, EntitlementError> {
        let user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| EntitlementError::user_not_found(cmd.user_id))?;

        let request = CreateCheckoutRequest {
            user_id: user.id,
            email: user.email.to_string(),
            product_id: self.settings.product_id.clone(),
            success_url: self.settings.success_url.clone(),
        };

        let session = tokio::time::timeout(
            self.settings.timeout,
            self.payments.create_checkout_session(request),
        )
        .await
        .map_err(|_| PaymentError::timeout())
        .and_then(|result| result)
        .map_err(|err| {
            tracing::error!(
                user_id = %user.id,
                error = %err,
                retryable = err.retryable,
                "Checkout creation failed"
            );
            EntitlementError::checkout_creation_failed(err.to_string())
        })?;

        tracing::info!(user_id = %user.id, checkout_id = %session.id, "Checkout session created");

        Ok(CreateCheckoutResult {
            checkout_url: session.url,
        })
    }
}
