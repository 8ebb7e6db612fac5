//! Magic-link token store port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MagicLinkTokenId};
use crate::domain::identity::MagicLinkToken;

/// Persistence for issued sign-in tokens.
///
/// Tokens are never deleted. The only mutation is `mark_used`.
#[async_trait]
pub trait MagicLinkRepository: Send + Sync {
    async fn save(&self, token: &MagicLinkToken) -> Result<(), DomainError>;

    /// Looks up a token by its exact value.
    async fn find_by_token(&self, token: &str) -> Result<Option<MagicLinkToken>, DomainError>;

    /// Atomically sets `used = true` where `id` matches and `used = false`.
    ///
    /// Returns `true` only for the single caller whose update affected the
    /// row; every concurrent or later caller gets `false`.
    async fn mark_used(&self, id: &MagicLinkTokenId) -> Result<bool, DomainError>;
}
