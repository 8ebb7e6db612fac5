//! PostgreSQL implementation of ArticleRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{ArticleId, DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::publishing::{Article, ArticleStatus};
use crate::ports::ArticleRepository;

pub struct PostgresArticleRepository {
    pool: PgPool,
}

impl PostgresArticleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Moves the author's listed articles from `from` to `to`; others are untouched.
    async fn set_status(
        &self,
        author_id: &UserId,
        ids: &[ArticleId],
        from: ArticleStatus,
        to: ArticleStatus,
    ) -> Result<Vec<ArticleId>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();

        let changed: Vec<Uuid> = sqlx::query_scalar(
            r#"
            UPDATE articles SET status = $4
            WHERE author_id = $1 AND id = ANY($2) AND status = $3
            RETURNING id
            "#,
        )
        .bind(author_id.as_uuid())
        .bind(&ids)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update articles: {}", e)))?;

        Ok(changed.into_iter().map(ArticleId::from_uuid).collect())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ArticleRow {
    id: Uuid,
    author_id: Uuid,
    title: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ArticleRow> for Article {
    type Error = DomainError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        let status = ArticleStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid article status: {}", row.status),
            )
        })?;
        Ok(Article {
            id: ArticleId::from_uuid(row.id),
            author_id: UserId::from_uuid(row.author_id),
            title: row.title,
            status,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl ArticleRepository for PostgresArticleRepository {
    async fn list_by_author(&self, author_id: &UserId) -> Result<Vec<Article>, DomainError> {
        let rows: Vec<ArticleRow> = sqlx::query_as(
            r#"
            SELECT id, author_id, title, status, created_at
            FROM articles
            WHERE author_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(author_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list articles: {}", e)))?;

        rows.into_iter().map(Article::try_from).collect()
    }

    async fn lock(
        &self,
        author_id: &UserId,
        ids: &[ArticleId],
    ) -> Result<Vec<ArticleId>, DomainError> {
        self.set_status(author_id, ids, ArticleStatus::Published, ArticleStatus::Locked)
            .await
    }

    async fn publish(
        &self,
        author_id: &UserId,
        ids: &[ArticleId],
    ) -> Result<Vec<ArticleId>, DomainError> {
        self.set_status(author_id, ids, ArticleStatus::Locked, ArticleStatus::Published)
            .await
    }
}
