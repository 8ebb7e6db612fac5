//! RequestMagicLinkHandler - issues a sign-in token and delivers the link.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::{EmailAddress, MagicLinkTokenId, Timestamp};
use crate::domain::identity::{IdentityError, MagicLinkToken};
use crate::ports::{Clock, DeliveryError, MagicLinkRepository, MagicLinkSender};

/// Command to request a magic link for an email address.
#[derive(Debug, Clone)]
pub struct RequestMagicLinkCommand {
    pub email: String,
}

/// Result of issuing a magic link.
#[derive(Debug, Clone)]
pub struct RequestMagicLinkResult {
    pub token_id: MagicLinkTokenId,
    pub expires_at: Timestamp,
    /// The full link, returned only outside production.
    pub debug_link: Option<String>,
}

/// Deployment-dependent behaviour of link issuance.
#[derive(Debug, Clone)]
pub struct MagicLinkSettings {
    /// Base URL links point at, without a trailing slash.
    pub app_base_url: String,
    /// Upper bound on a single delivery attempt.
    pub delivery_timeout: Duration,
    /// Production: delivery failure is an error and no link is echoed.
    pub is_production: bool,
}

impl MagicLinkSettings {
    pub fn new(app_base_url: impl Into<String>, is_production: bool) -> Self {
        Self {
            app_base_url: app_base_url.into().trim_end_matches('/').to_string(),
            delivery_timeout: Duration::from_secs(10),
            is_production,
        }
    }

    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    fn link_for(&self, token: &str) -> String {
        format!("{}/auth/verify?token={}", self.app_base_url, token)
    }
}

/// Handler for magic-link issuance.
///
/// The token is persisted before delivery is attempted, so a link that
/// arrives late still redeems. In production a failed delivery is reported
/// to the caller; in development it is logged and the link is returned for
/// manual use.
pub struct RequestMagicLinkHandler {
    tokens: Arc<dyn MagicLinkRepository>,
    sender: Arc<dyn MagicLinkSender>,
    clock: Arc<dyn Clock>,
    settings: MagicLinkSettings,
}

impl RequestMagicLinkHandler {
    pub fn new(
        tokens: Arc<dyn MagicLinkRepository>,
        sender: Arc<dyn MagicLinkSender>,
        clock: Arc<dyn Clock>,
        settings: MagicLinkSettings,
    ) -> Self {
        Self {
            tokens,
            sender,
            clock,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: RequestMagicLinkCommand,
    ) -> Result<RequestMagicLinkResult, IdentityError> {
        // 1. Validate the address
        let email = EmailAddress::parse(&cmd.email)?;

        // 2. Issue and persist the token
        let token = MagicLinkToken::issue(email, self.clock.now());
        self.tokens.save(&token).await?;

        let link = self.settings.link_for(&token.token);

        // 3. Deliver
        if let Err(err) = self.deliver(&token.email, &link).await {
            if self.settings.is_production {
                tracing::error!(
                    token_id = %token.id,
                    token = %token.redacted(),
                    error = %err,
                    "Magic link delivery failed"
                );
                return Err(IdentityError::delivery_failed(err.to_string()));
            }
            tracing::warn!(
                token_id = %token.id,
                token = %token.redacted(),
                error = %err,
                "Magic link delivery failed; continuing with debug link"
            );
        }

        tracing::info!(
            token_id = %token.id,
            token = %token.redacted(),
            expires_at = %token.expires_at,
            "Magic link issued"
        );

        Ok(RequestMagicLinkResult {
            token_id: token.id,
            expires_at: token.expires_at,
            debug_link: (!self.settings.is_production).then_some(link),
        })
    }

    async fn deliver(&self, to: &EmailAddress, link: &str) -> Result<(), DeliveryError> {
        match tokio::time::timeout(self.settings.delivery_timeout, self.sender.send(to, link))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::Timeout),
        }
    }
}
