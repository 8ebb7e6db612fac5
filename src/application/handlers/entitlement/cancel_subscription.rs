//! CancelSubscriptionHandler - user-initiated cancellation.

use std::sync::Arc;
use std::time::Duration;

use crate::application::handlers::publishing::{ApplyAccessPolicyCommand, ApplyAccessPolicyHandler};
use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::{ArticleId, UserId};
use crate::ports::{Clock, PaymentError, PaymentProvider, UserRepository};

/// Command to cancel the caller's subscription.
#[derive(Debug, Clone)]
pub struct CancelSubscriptionCommand {
    pub user_id: UserId,
}

/// Result of a completed cancellation.
#[derive(Debug, Clone)]
pub struct CancelSubscriptionResult {
    /// Articles locked by the access policy.
    pub locked: Vec<ArticleId>,
}

/// Handler for manual cancellation.
///
/// The provider must confirm the revocation before any local state changes.
/// If it does not, the user stays paid and keeps their articles.
pub struct CancelSubscriptionHandler {
    users: Arc<dyn UserRepository>,
    payments: Arc<dyn PaymentProvider>,
    access_policy: Arc<ApplyAccessPolicyHandler>,
    clock: Arc<dyn Clock>,
    revoke_timeout: Duration,
}

impl CancelSubscriptionHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        payments: Arc<dyn PaymentProvider>,
        access_policy: Arc<ApplyAccessPolicyHandler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            payments,
            access_policy,
            clock,
            revoke_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_revoke_timeout(mut self, timeout: Duration) -> Self {
        self.revoke_timeout = timeout;
        self
    }

    pub async fn handle(
        &self,
        cmd: CancelSubscriptionCommand,
    ) -> Result<CancelSubscriptionResult, EntitlementError> {
        // 1. Load and check entitlement
        let mut user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| EntitlementError::user_not_found(cmd.user_id))?;

        if !user.is_paid {
            return Err(EntitlementError::NoActiveSubscription);
        }

        // 2. Revoke at the provider, failing closed
        match user.subscription_ref.as_deref() {
            Some(subscription_ref) => {
                if let Err(err) = self.revoke(subscription_ref).await {
                    tracing::error!(
                        user_id = %cmd.user_id,
                        subscription_ref,
                        error = %err,
                        retryable = err.retryable,
                        "Subscription revocation failed; user remains paid"
                    );
                    return Err(EntitlementError::revocation_failed(err.to_string()));
                }
            }
            None => {
                tracing::warn!(
                    user_id = %cmd.user_id,
                    "Paid user has no subscription reference; skipping provider revocation"
                );
            }
        }

        // 3. Downgrade locally
        user.end_subscription(self.clock.now());
        self.users.update_entitlement(&user).await?;

        // 4. Enforce the free-plan article limit
        let locked = self
            .access_policy
            .handle(ApplyAccessPolicyCommand {
                user_id: cmd.user_id,
            })
            .await?
            .locked;

        tracing::info!(
            user_id = %cmd.user_id,
            locked = locked.len(),
            "Subscription canceled"
        );

        Ok(CancelSubscriptionResult { locked })
    }

    async fn revoke(&self, subscription_ref: &str) -> Result<(), PaymentError> {
        tokio::time::timeout(
            self.revoke_timeout,
            self.payments.revoke_subscription(subscription_ref),
        )
        .await
        .map_err(|_| PaymentError::timeout())?
    }
}
