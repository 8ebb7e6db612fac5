//! RepublishArticlesHandler - explicit unlock after regaining a paid plan.
//!
//! Regaining entitlement never unlocks anything by itself; the author asks
//! for it through this command.

use std::sync::Arc;

use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::{ArticleId, UserId};
use crate::domain::publishing::articles_to_republish;
use crate::ports::{ArticleRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct RepublishArticlesCommand {
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct RepublishArticlesResult {
    pub republished: Vec<ArticleId>,
}

pub struct RepublishArticlesHandler {
    users: Arc<dyn UserRepository>,
    articles: Arc<dyn ArticleRepository>,
}

impl RepublishArticlesHandler {
    pub fn new(users: Arc<dyn UserRepository>, articles: Arc<dyn ArticleRepository>) -> Self {
        Self { users, articles }
    }

    pub async fn handle(
        &self,
        cmd: RepublishArticlesCommand,
    ) -> Result<RepublishArticlesResult, EntitlementError> {
        let user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| EntitlementError::user_not_found(cmd.user_id))?;

        if !user.is_paid {
            tracing::info!(user_id = %cmd.user_id, "Republish refused: user is on the free plan");
            return Err(EntitlementError::PaidPlanRequired);
        }

        let owned = self.articles.list_by_author(&cmd.user_id).await?;
        let candidates = articles_to_republish(&owned);
        let republished = if candidates.is_empty() {
            Vec::new()
        } else {
            self.articles.publish(&cmd.user_id, &candidates).await?
        };

        tracing::info!(
            user_id = %cmd.user_id,
            republished = republished.len(),
            "Locked articles republished"
        );

        Ok(RepublishArticlesResult { republished })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryArticleRepository, InMemoryUserRepository};
    use crate::domain::foundation::{EmailAddress, Timestamp};
    use crate::domain::identity::User;
    use crate::domain::publishing::{Article, ArticleStatus};

    fn user(paid: bool) -> User {
        let mut user = User::provision(
            EmailAddress::parse("carol@example.com").unwrap(),
            "carol_abcdef".to_string(),
            Timestamp::now(),
        );
        if paid {
            user.activate_subscription("sub_9", Timestamp::now());
        }
        user
    }

    fn locked_article(author: UserId) -> Article {
        let mut article = Article::new(author, "old", Timestamp::now());
        article.status = ArticleStatus::Locked;
        article
    }

    #[tokio::test]
    async fn paid_user_gets_locked_articles_back() {
        let carol = user(true);
        let article = locked_article(carol.id);
        let articles = Arc::new(InMemoryArticleRepository::with_articles([article.clone()]));
        let handler = RepublishArticlesHandler::new(
            Arc::new(InMemoryUserRepository::with_users([carol.clone()])),
            articles.clone(),
        );

        let result = handler
            .handle(RepublishArticlesCommand { user_id: carol.id })
            .await
            .unwrap();

        assert_eq!(result.republished, vec![article.id]);
        assert!(articles.get(&article.id).unwrap().is_published());
    }

    #[tokio::test]
    async fn free_user_is_refused() {
        let carol = user(false);
        let article = locked_article(carol.id);
        let articles = Arc::new(InMemoryArticleRepository::with_articles([article.clone()]));
        let handler = RepublishArticlesHandler::new(
            Arc::new(InMemoryUserRepository::with_users([carol.clone()])),
            articles.clone(),
        );

        let err = handler
            .handle(RepublishArticlesCommand { user_id: carol.id })
            .await
            .unwrap_err();

        assert_eq!(err, EntitlementError::PaidPlanRequired);
        assert!(articles.get(&article.id).unwrap().is_locked());
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let handler = RepublishArticlesHandler::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryArticleRepository::new()),
        );
        let id = UserId::new();
        let err = handler
            .handle(RepublishArticlesCommand { user_id: id })
            .await
            .unwrap_err();
        assert_eq!(err, EntitlementError::UserNotFound(id));
    }
}
