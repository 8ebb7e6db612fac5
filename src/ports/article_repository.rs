//! Article repository port.
//!
//! Access control only needs ownership, creation order, and status; the
//! content itself is out of scope here.

use async_trait::async_trait;

use crate::domain::foundation::{ArticleId, DomainError, UserId};
use crate::domain::publishing::Article;

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// All of an author's articles, ordered by `created_at` then id, ascending.
    async fn list_by_author(&self, author_id: &UserId) -> Result<Vec<Article>, DomainError>;

    /// Sets `status = locked` on the given articles that are currently published.
    ///
    /// Returns the ids that actually changed.
    async fn lock(
        &self,
        author_id: &UserId,
        ids: &[ArticleId],
    ) -> Result<Vec<ArticleId>, DomainError>;

    /// Sets `status = published` on the given articles that are currently locked.
    ///
    /// Returns the ids that actually changed.
    async fn publish(
        &self,
        author_id: &UserId,
        ids: &[ArticleId],
    ) -> Result<Vec<ArticleId>, DomainError>;
}
