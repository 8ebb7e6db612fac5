//! HandleBillingWebhookHandler - applies verified billing events to users.

use std::sync::Arc;

use crate::application::handlers::publishing::{ApplyAccessPolicyCommand, ApplyAccessPolicyHandler};
use crate::domain::entitlement::{
    BillingEvent, EntitlementChange, WebhookError, WebhookHeaders, WebhookVerifier,
};
use crate::domain::foundation::{ArticleId, UserId};
use crate::ports::{Clock, UserRepository};

/// Command carrying a webhook exactly as received.
#[derive(Debug, Clone)]
pub struct HandleBillingWebhookCommand {
    pub webhook_id: Option<String>,
    pub webhook_timestamp: Option<String>,
    pub webhook_signature: Option<String>,
    /// Raw body bytes; the signature covers these, not a re-serialization.
    pub body: Vec<u8>,
}

/// Outcome of processing a verified webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleBillingWebhookResult {
    /// A subscription event was applied (possibly as a no-op replay).
    Applied {
        user_id: UserId,
        change: EntitlementChange,
        /// Articles locked as a consequence, if cancellation locking is enabled.
        locked: Vec<ArticleId>,
    },
    /// Event type we do not act on.
    Ignored { event_type: String },
}

/// Handler for billing provider webhooks.
///
/// Nothing in the body is read until the signature verifies. Recognised
/// events set the user's entitlement to an absolute state, so redelivery of
/// the same event leaves the user unchanged.
pub struct HandleBillingWebhookHandler {
    verifier: Arc<WebhookVerifier>,
    users: Arc<dyn UserRepository>,
    access_policy: Arc<ApplyAccessPolicyHandler>,
    clock: Arc<dyn Clock>,
    lock_on_provider_cancellation: bool,
}

impl HandleBillingWebhookHandler {
    pub fn new(
        verifier: Arc<WebhookVerifier>,
        users: Arc<dyn UserRepository>,
        access_policy: Arc<ApplyAccessPolicyHandler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            verifier,
            users,
            access_policy,
            clock,
            lock_on_provider_cancellation: false,
        }
    }

    /// Also lock articles when the provider reports a cancellation.
    pub fn with_lock_on_provider_cancellation(mut self, enabled: bool) -> Self {
        self.lock_on_provider_cancellation = enabled;
        self
    }

    pub async fn handle(
        &self,
        cmd: HandleBillingWebhookCommand,
    ) -> Result<HandleBillingWebhookResult, WebhookError> {
        let webhook_id = cmd.webhook_id.clone().unwrap_or_else(|| "-".to_string());
        let outcome = self.process(cmd).await;

        if let Err(err) = &outcome {
            if err.is_verification_failure() {
                tracing::warn!(%webhook_id, error = %err, "Billing webhook rejected");
            } else if err.is_retryable() {
                tracing::error!(
                    %webhook_id,
                    error = %err,
                    "Billing webhook failed; provider will retry"
                );
            } else {
                tracing::warn!(%webhook_id, error = %err, "Verified billing webhook dropped");
            }
        }
        outcome
    }

    async fn process(
        &self,
        cmd: HandleBillingWebhookCommand,
    ) -> Result<HandleBillingWebhookResult, WebhookError> {
        // 1. Verify against the raw bytes
        let headers = WebhookHeaders {
            id: cmd.webhook_id.as_deref(),
            timestamp: cmd.webhook_timestamp.as_deref(),
            signature: cmd.webhook_signature.as_deref(),
        };
        self.verifier.verify(&headers, &cmd.body, self.clock.now())?;

        // 2. Parse
        let event = BillingEvent::parse(&cmd.body)?;

        // 3. Apply
        let result = match event {
            BillingEvent::SubscriptionActive {
                subscription_ref,
                user_id,
            } => self.activate(user_id, &subscription_ref).await?,
            BillingEvent::SubscriptionCanceled {
                subscription_ref,
                user_id,
            } => self.cancel(user_id, &subscription_ref).await?,
            BillingEvent::Unrecognized { event_type } => {
                tracing::debug!(%event_type, "Ignoring billing event");
                HandleBillingWebhookResult::Ignored { event_type }
            }
        };

        Ok(result)
    }

    async fn activate(
        &self,
        user_id: UserId,
        subscription_ref: &str,
    ) -> Result<HandleBillingWebhookResult, WebhookError> {
        let mut user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or(WebhookError::UserNotFound)?;

        let change = user.activate_subscription(subscription_ref, self.clock.now());
        if change.is_write_required() {
            self.users.update_entitlement(&user).await?;
        }

        tracing::info!(
            %user_id,
            subscription_ref,
            ?change,
            "Subscription activated"
        );

        Ok(HandleBillingWebhookResult::Applied {
            user_id,
            change,
            locked: Vec::new(),
        })
    }

    async fn cancel(
        &self,
        user_id: UserId,
        subscription_ref: &str,
    ) -> Result<HandleBillingWebhookResult, WebhookError> {
        let mut user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or(WebhookError::UserNotFound)?;

        let change = user.end_subscription(self.clock.now());
        if change.is_write_required() {
            self.users.update_entitlement(&user).await?;
        }

        tracing::info!(
            %user_id,
            subscription_ref,
            ?change,
            "Subscription canceled by provider"
        );

        let mut locked = Vec::new();
        if change == EntitlementChange::Downgraded {
            if self.lock_on_provider_cancellation {
                locked = self
                    .access_policy
                    .handle(ApplyAccessPolicyCommand { user_id })
                    .await
                    .map_err(|e| WebhookError::Database(e.to_string()))?
                    .locked;
            } else {
                tracing::warn!(
                    %user_id,
                    "Provider cancellation downgraded user; articles left published"
                );
            }
        }

        Ok(HandleBillingWebhookResult::Applied {
            user_id,
            change,
            locked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryArticleRepository, InMemoryUserRepository};
    use crate::domain::foundation::{DomainError, EmailAddress, Timestamp};
    use crate::domain::identity::User;
    use crate::domain::publishing::Article;
    use crate::ports::ManualClock;
    use secrecy::SecretString;
    use serde_json::json;

    const SECRET: &str = "whsec_test_secret";

    // ══════════════════════════════════════════════════════════════
    // Test Helpers
    // ══════════════════════════════════════════════════════════════

    struct Fixture {
        users: Arc<InMemoryUserRepository>,
        articles: Arc<InMemoryArticleRepository>,
        user: User,
        verifier: Arc<WebhookVerifier>,
        clock: Arc<ManualClock>,
    }

    impl Fixture {
        fn new() -> Self {
            let user = User::provision(
                EmailAddress::parse("alice@example.com").unwrap(),
                "alice_a1b2c3".to_string(),
                Timestamp::now(),
            );
            Self {
                users: Arc::new(InMemoryUserRepository::with_users([user.clone()])),
                articles: Arc::new(InMemoryArticleRepository::new()),
                user,
                verifier: Arc::new(WebhookVerifier::new(SecretString::new(SECRET.to_string()))),
                clock: Arc::new(ManualClock::new(Timestamp::now())),
            }
        }

        fn handler(&self) -> HandleBillingWebhookHandler {
            HandleBillingWebhookHandler::new(
                self.verifier.clone(),
                self.users.clone(),
                Arc::new(ApplyAccessPolicyHandler::new(self.articles.clone())),
                self.clock.clone(),
            )
        }

        fn signed(&self, body: serde_json::Value) -> HandleBillingWebhookCommand {
            let body = serde_json::to_vec(&body).unwrap();
            let ts = self.clock.now().as_unix_secs().to_string();
            let sig = self.verifier.sign("msg_1", &ts, &body).unwrap();
            HandleBillingWebhookCommand {
                webhook_id: Some("msg_1".to_string()),
                webhook_timestamp: Some(ts),
                webhook_signature: Some(format!("v1,{}", sig)),
                body,
            }
        }

        async fn stored(&self) -> User {
            self.users.find_by_id(&self.user.id).await.unwrap().unwrap()
        }
    }

    fn event(event_type: &str, sub: &str, user_id: UserId) -> serde_json::Value {
        json!({
            "type": event_type,
            "data": { "id": sub, "metadata": { "userId": user_id.to_string() } }
        })
    }

    // ══════════════════════════════════════════════════════════════
    // Verification Gate
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn placeholder_signature_is_rejected_without_state_change() {
        let fx = Fixture::new();
        let mut cmd = fx.signed(event("subscription.active", "sub_1", fx.user.id));
        cmd.webhook_signature = Some("v1,AAAA==".to_string());

        let err = fx.handler().handle(cmd).await.unwrap_err();

        assert!(matches!(err, WebhookError::InvalidSignature));
        assert!(!fx.stored().await.is_paid);
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let fx = Fixture::new();
        let mut cmd = fx.signed(event("subscription.active", "sub_1", fx.user.id));
        cmd.webhook_id = None;

        let err = fx.handler().handle(cmd).await.unwrap_err();

        assert!(matches!(err, WebhookError::MissingHeaders));
    }

    #[tokio::test]
    async fn signature_over_different_body_is_rejected() {
        let fx = Fixture::new();
        let mut cmd = fx.signed(event("subscription.active", "sub_1", fx.user.id));
        cmd.body = serde_json::to_vec(&event("subscription.active", "sub_2", fx.user.id)).unwrap();

        let err = fx.handler().handle(cmd).await.unwrap_err();

        assert!(matches!(err, WebhookError::InvalidSignature));
    }

    // ══════════════════════════════════════════════════════════════
    // Event Handling
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn active_then_canceled_round_trips_state() {
        let fx = Fixture::new();
        let handler = fx.handler();

        let result = handler
            .handle(fx.signed(event("subscription.active", "sub_1", fx.user.id)))
            .await
            .unwrap();
        assert!(matches!(
            result,
            HandleBillingWebhookResult::Applied {
                change: EntitlementChange::Upgraded,
                ..
            }
        ));
        let paid = fx.stored().await;
        assert!(paid.is_paid);
        assert_eq!(paid.subscription_ref.as_deref(), Some("sub_1"));

        handler
            .handle(fx.signed(event("subscription.canceled", "sub_1", fx.user.id)))
            .await
            .unwrap();
        let free = fx.stored().await;
        assert!(!free.is_paid);
        assert!(free.subscription_ref.is_none());
    }

    #[tokio::test]
    async fn replayed_activation_is_unchanged() {
        let fx = Fixture::new();
        let handler = fx.handler();
        let body = event("subscription.active", "sub_1", fx.user.id);

        handler.handle(fx.signed(body.clone())).await.unwrap();
        let before = fx.stored().await;
        fx.clock.advance_secs(30);
        let replay = handler.handle(fx.signed(body)).await.unwrap();

        assert!(matches!(
            replay,
            HandleBillingWebhookResult::Applied {
                change: EntitlementChange::Unchanged,
                ..
            }
        ));
        assert_eq!(fx.stored().await, before);
    }

    #[tokio::test]
    async fn missing_user_id_is_malformed_event() {
        let fx = Fixture::new();
        let cmd = fx.signed(json!({ "type": "subscription.active", "data": { "id": "sub_1" } }));

        let err = fx.handler().handle(cmd).await.unwrap_err();

        assert!(matches!(err, WebhookError::MalformedEvent(_)));
        assert!(!fx.stored().await.is_paid);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let fx = Fixture::new();
        let cmd = fx.signed(event("subscription.active", "sub_1", UserId::new()));

        let err = fx.handler().handle(cmd).await.unwrap_err();

        assert!(matches!(err, WebhookError::UserNotFound));
    }

    #[tokio::test]
    async fn unrecognized_type_is_ignored() {
        let fx = Fixture::new();
        let cmd = fx.signed(json!({ "type": "invoice.created", "data": {} }));

        let result = fx.handler().handle(cmd).await.unwrap();

        assert_eq!(
            result,
            HandleBillingWebhookResult::Ignored {
                event_type: "invoice.created".to_string()
            }
        );
    }

    #[tokio::test]
    async fn signed_non_json_body_is_malformed_payload() {
        let fx = Fixture::new();
        let body = b"not json".to_vec();
        let ts = fx.clock.now().as_unix_secs().to_string();
        let sig = fx.verifier.sign("msg_1", &ts, &body).unwrap();

        let err = fx
            .handler()
            .handle(HandleBillingWebhookCommand {
                webhook_id: Some("msg_1".to_string()),
                webhook_timestamp: Some(ts),
                webhook_signature: Some(format!("v1,{}", sig)),
                body,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, WebhookError::MalformedPayload(_)));
    }

    /// Every read and write fails as if the database were down.
    struct UnavailableUsers;

    #[async_trait::async_trait]
    impl UserRepository for UnavailableUsers {
        async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn find_by_email(&self, _email: &EmailAddress) -> Result<Option<User>, DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn insert(&self, _user: &User) -> Result<(), DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn update_entitlement(&self, _user: &User) -> Result<(), DomainError> {
            Err(DomainError::database("connection refused"))
        }
        async fn update_password(&self, _user: &User) -> Result<(), DomainError> {
            Err(DomainError::database("connection refused"))
        }
    }

    #[tokio::test]
    async fn store_outage_is_retryable_server_error() {
        let fx = Fixture::new();
        let handler = HandleBillingWebhookHandler::new(
            fx.verifier.clone(),
            Arc::new(UnavailableUsers),
            Arc::new(ApplyAccessPolicyHandler::new(fx.articles.clone())),
            fx.clock.clone(),
        );

        let err = handler
            .handle(fx.signed(event("subscription.active", "sub_1", fx.user.id)))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert!(!err.is_verification_failure());
        assert!(err.status_code().is_server_error());
    }

    // ══════════════════════════════════════════════════════════════
    // Provider Cancellation and Articles
    // ══════════════════════════════════════════════════════════════

    /// Paid user with two published articles, the first one older.
    async fn paid_with_two_articles() -> (Fixture, Article, Article) {
        let mut fx = Fixture::new();
        let t0 = Timestamp::now();
        let first = Article::new(fx.user.id, "first", t0);
        let second = Article::new(fx.user.id, "second", t0.plus_secs(10));
        fx.articles = Arc::new(InMemoryArticleRepository::with_articles([
            first.clone(),
            second.clone(),
        ]));
        let mut user = fx.user.clone();
        user.activate_subscription("sub_1", t0);
        fx.users.update_entitlement(&user).await.unwrap();
        (fx, first, second)
    }

    #[tokio::test]
    async fn provider_cancellation_leaves_articles_published_by_default() {
        let (fx, _, second) = paid_with_two_articles().await;

        let result = fx
            .handler()
            .handle(fx.signed(event("subscription.canceled", "sub_1", fx.user.id)))
            .await
            .unwrap();

        assert!(matches!(
            result,
            HandleBillingWebhookResult::Applied {
                change: EntitlementChange::Downgraded,
                ref locked,
                ..
            } if locked.is_empty()
        ));
        assert!(fx.articles.get(&second.id).unwrap().is_published());
    }

    #[tokio::test]
    async fn provider_cancellation_locks_when_enabled() {
        let (fx, first, second) = paid_with_two_articles().await;

        let result = fx
            .handler()
            .with_lock_on_provider_cancellation(true)
            .handle(fx.signed(event("subscription.canceled", "sub_1", fx.user.id)))
            .await
            .unwrap();

        assert!(matches!(
            result,
            HandleBillingWebhookResult::Applied { ref locked, .. } if *locked == vec![second.id]
        ));
        assert!(fx.articles.get(&first.id).unwrap().is_published());
        assert!(fx.articles.get(&second.id).unwrap().is_locked());
    }
}
