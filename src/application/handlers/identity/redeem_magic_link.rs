//! RedeemMagicLinkHandler - consumes a sign-in token and resolves the user.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{EmailAddress, ErrorCode};
use crate::domain::identity::{
    generate_username, is_well_formed_token, redact_token, Credential, CredentialKind,
    IdentityError, User,
};
use crate::ports::{Clock, CredentialVerifier, MagicLinkRepository, UserRepository};

/// Attempts at allocating a unique username before giving up.
const MAX_USERNAME_ATTEMPTS: usize = 5;

/// Command to redeem a magic-link token.
#[derive(Debug, Clone)]
pub struct RedeemMagicLinkCommand {
    pub token: String,
}

/// Result of a successful redemption.
#[derive(Debug, Clone)]
pub struct RedeemMagicLinkResult {
    pub user: User,
    /// True when this redemption created the account.
    pub created: bool,
}

/// Handler for magic-link redemption.
///
/// Checks run in a fixed order: unknown token, already used, expired. The
/// token is then consumed with a conditional update, so of any number of
/// concurrent redemptions exactly one proceeds.
pub struct RedeemMagicLinkHandler {
    tokens: Arc<dyn MagicLinkRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl RedeemMagicLinkHandler {
    pub fn new(
        tokens: Arc<dyn MagicLinkRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tokens,
            users,
            clock,
        }
    }

    pub async fn handle(
        &self,
        cmd: RedeemMagicLinkCommand,
    ) -> Result<RedeemMagicLinkResult, IdentityError> {
        let redacted = redact_token(&cmd.token);

        // 1. Look up the token
        if !is_well_formed_token(&cmd.token) {
            tracing::warn!(token = %redacted, reason = "malformed", "Magic link rejected");
            return Err(IdentityError::InvalidToken);
        }
        let token = match self.tokens.find_by_token(&cmd.token).await? {
            Some(token) => token,
            None => {
                tracing::warn!(token = %redacted, reason = "unknown", "Magic link rejected");
                return Err(IdentityError::InvalidToken);
            }
        };

        // 2. Used, then expired
        if let Err(err) = token.ensure_redeemable(self.clock.now()) {
            tracing::warn!(
                token_id = %token.id,
                token = %redacted,
                reason = %err.code(),
                "Magic link rejected"
            );
            return Err(err);
        }

        // 3. Consume; only one caller wins
        if !self.tokens.mark_used(&token.id).await? {
            tracing::warn!(
                token_id = %token.id,
                token = %redacted,
                reason = "lost_race",
                "Magic link rejected"
            );
            return Err(IdentityError::TokenAlreadyUsed);
        }

        // 4. Resolve or provision the user
        let (user, created) = self.find_or_provision(&token.email).await?;

        tracing::info!(
            token_id = %token.id,
            token = %redacted,
            user_id = %user.id,
            created,
            "Magic link redeemed"
        );

        Ok(RedeemMagicLinkResult { user, created })
    }

    async fn find_or_provision(&self, email: &EmailAddress) -> Result<(User, bool), IdentityError> {
        if let Some(existing) = self.users.find_by_email(email).await? {
            return Ok((existing, false));
        }

        for attempt in 1..=MAX_USERNAME_ATTEMPTS {
            let user = User::provision(email.clone(), generate_username(email), self.clock.now());
            match self.users.insert(&user).await {
                Ok(()) => return Ok((user, true)),
                Err(err) if err.code == ErrorCode::UsernameTaken => {
                    tracing::debug!(attempt, username = %user.username, "Username collision, retrying");
                }
                Err(err) if err.code == ErrorCode::EmailTaken => {
                    // Another redemption for the same address created the account first.
                    return self
                        .users
                        .find_by_email(email)
                        .await?
                        .map(|existing| (existing, false))
                        .ok_or_else(|| {
                            IdentityError::provisioning_failed("email taken but user not found")
                        });
                }
                Err(err) => return Err(err.into()),
            }
        }

        tracing::error!(
            attempts = MAX_USERNAME_ATTEMPTS,
            "Could not allocate a unique username"
        );
        Err(IdentityError::provisioning_failed("username space exhausted"))
    }
}

#[async_trait]
impl CredentialVerifier for RedeemMagicLinkHandler {
    fn kind(&self) -> CredentialKind {
        CredentialKind::MagicLink
    }

    async fn verify(&self, credential: Credential) -> Result<User, IdentityError> {
        match credential {
            Credential::MagicLink { token } => {
                Ok(self.handle(RedeemMagicLinkCommand { token }).await?.user)
            }
            _ => Err(IdentityError::InvalidCredentials),
        }
    }
}
