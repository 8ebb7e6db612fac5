//! In-memory magic-link token store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MagicLinkTokenId};
use crate::domain::identity::MagicLinkToken;
use crate::ports::MagicLinkRepository;

use super::lock_poisoned;

/// Token store whose `mark_used` checks and sets under one lock guard.
#[derive(Default)]
pub struct InMemoryMagicLinkRepository {
    tokens: Mutex<HashMap<MagicLinkTokenId, MagicLinkToken>>,
}

impl InMemoryMagicLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored token.
    pub fn all(&self) -> Vec<MagicLinkToken> {
        self.tokens
            .lock()
            .map(|t| t.values().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MagicLinkRepository for InMemoryMagicLinkRepository {
    async fn save(&self, token: &MagicLinkToken) -> Result<(), DomainError> {
        let mut tokens = self.tokens.lock().map_err(|_| lock_poisoned())?;
        tokens.insert(token.id, token.clone());
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<MagicLinkToken>, DomainError> {
        let tokens = self.tokens.lock().map_err(|_| lock_poisoned())?;
        Ok(tokens.values().find(|t| t.token == token).cloned())
    }

    async fn mark_used(&self, id: &MagicLinkTokenId) -> Result<bool, DomainError> {
        let mut tokens = self.tokens.lock().map_err(|_| lock_poisoned())?;
        match tokens.get_mut(id) {
            Some(token) if !token.used => {
                token.used = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{EmailAddress, Timestamp};

    fn token() -> MagicLinkToken {
        MagicLinkToken::issue(
            EmailAddress::parse("alice@example.com").unwrap(),
            Timestamp::now(),
        )
    }

    #[tokio::test]
    async fn find_by_token_matches_exact_value() {
        let repo = InMemoryMagicLinkRepository::new();
        let t = token();
        repo.save(&t).await.unwrap();

        assert_eq!(repo.find_by_token(&t.token).await.unwrap(), Some(t.clone()));
        assert_eq!(repo.find_by_token(&t.token.to_uppercase()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn mark_used_succeeds_once() {
        let repo = InMemoryMagicLinkRepository::new();
        let t = token();
        repo.save(&t).await.unwrap();

        assert!(repo.mark_used(&t.id).await.unwrap());
        assert!(!repo.mark_used(&t.id).await.unwrap());
        assert!(repo.find_by_token(&t.token).await.unwrap().unwrap().used);
    }

    #[tokio::test]
    async fn mark_used_on_unknown_id_is_false() {
        let repo = InMemoryMagicLinkRepository::new();
        assert!(!repo.mark_used(&MagicLinkTokenId::new()).await.unwrap());
    }
}
