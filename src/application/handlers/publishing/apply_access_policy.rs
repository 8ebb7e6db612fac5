//! ApplyAccessPolicyHandler - locks a downgraded user's articles.

use std::sync::Arc;

use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::{ArticleId, UserId};
use crate::domain::publishing::articles_to_lock;
use crate::ports::ArticleRepository;

#[derive(Debug, Clone)]
pub struct ApplyAccessPolicyCommand {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Default)]
pub struct ApplyAccessPolicyResult {
    /// Articles this run moved from published to locked.
    pub locked: Vec<ArticleId>,
}

/// Keeps the earliest article published and locks the rest.
///
/// Safe to run repeatedly: already-locked articles are left alone and the
/// exempt article never changes.
pub struct ApplyAccessPolicyHandler {
    articles: Arc<dyn ArticleRepository>,
}

impl ApplyAccessPolicyHandler {
    pub fn new(articles: Arc<dyn ArticleRepository>) -> Self {
        Self { articles }
    }

    pub async fn handle(
        &self,
        cmd: ApplyAccessPolicyCommand,
    ) -> Result<ApplyAccessPolicyResult, EntitlementError> {
        let owned = self.articles.list_by_author(&cmd.user_id).await?;
        let to_lock = articles_to_lock(&owned);

        if to_lock.is_empty() {
            tracing::debug!(user_id = %cmd.user_id, "Access policy: nothing to lock");
            return Ok(ApplyAccessPolicyResult::default());
        }

        let locked = self.articles.lock(&cmd.user_id, &to_lock).await?;

        tracing::info!(
            user_id = %cmd.user_id,
            candidates = to_lock.len(),
            locked = locked.len(),
            "Access policy applied"
        );

        Ok(ApplyAccessPolicyResult { locked })
    }
}
