//! In-memory article repository.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{ArticleId, DomainError, UserId};
use crate::domain::publishing::{Article, ArticleStatus};
use crate::ports::ArticleRepository;

use super::lock_poisoned;

#[derive(Default)]
pub struct InMemoryArticleRepository {
    articles: Mutex<HashMap<ArticleId, Article>>,
}

impl InMemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(articles: impl IntoIterator<Item = Article>) -> Self {
        Self {
            articles: Mutex::new(articles.into_iter().map(|a| (a.id, a)).collect()),
        }
    }

    pub fn get(&self, id: &ArticleId) -> Option<Article> {
        self.articles.lock().ok().and_then(|a| a.get(id).cloned())
    }

    fn set_status(
        &self,
        author_id: &UserId,
        ids: &[ArticleId],
        from: ArticleStatus,
        to: ArticleStatus,
    ) -> Result<Vec<ArticleId>, DomainError> {
        let mut articles = self.articles.lock().map_err(|_| lock_poisoned())?;
        let mut changed = Vec::new();
        for id in ids {
            if let Some(article) = articles.get_mut(id) {
                if &article.author_id == author_id && article.status == from {
                    article.status = to;
                    changed.push(*id);
                }
            }
        }
        Ok(changed)
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn list_by_author(&self, author_id: &UserId) -> Result<Vec<Article>, DomainError> {
        let articles = self.articles.lock().map_err(|_| lock_poisoned())?;
        let mut owned: Vec<Article> = articles
            .values()
            .filter(|a| &a.author_id == author_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(owned)
    }

    async fn lock(
        &self,
        author_id: &UserId,
        ids: &[ArticleId],
    ) -> Result<Vec<ArticleId>, DomainError> {
        self.set_status(author_id, ids, ArticleStatus::Published, ArticleStatus::Locked)
    }

    async fn publish(
        &self,
        author_id: &UserId,
        ids: &[ArticleId],
    ) -> Result<Vec<ArticleId>, DomainError> {
        self.set_status(author_id, ids, ArticleStatus::Locked, ArticleStatus::Published)
    }
}
