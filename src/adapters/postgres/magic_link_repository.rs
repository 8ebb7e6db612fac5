//! PostgreSQL implementation of MagicLinkRepository.
//!
//! Single use is enforced by the database: `mark_used` is a conditional
//! update and only the statement that flips `used` sees a row affected.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, MagicLinkTokenId, Timestamp};
use crate::domain::identity::MagicLinkToken;
use crate::ports::MagicLinkRepository;

pub struct PostgresMagicLinkRepository {
    pool: PgPool,
}

impl PostgresMagicLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MagicLinkRow {
    id: Uuid,
    email: String,
    token: String,
    expires_at: DateTime<Utc>,
    used: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<MagicLinkRow> for MagicLinkToken {
    type Error = DomainError;

    fn try_from(row: MagicLinkRow) -> Result<Self, Self::Error> {
        let email = EmailAddress::parse(&row.email).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored email: {}", e))
        })?;
        Ok(MagicLinkToken {
            id: MagicLinkTokenId::from_uuid(row.id),
            email,
            token: row.token,
            expires_at: Timestamp::from_datetime(row.expires_at),
            used: row.used,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl MagicLinkRepository for PostgresMagicLinkRepository {
    async fn save(&self, token: &MagicLinkToken) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO magic_link_tokens (id, email, token, expires_at, used, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(token.id.as_uuid())
        .bind(token.email.as_str())
        .bind(&token.token)
        .bind(token.expires_at.as_datetime())
        .bind(token.used)
        .bind(token.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save magic link: {}", e)))?;

        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<MagicLinkToken>, DomainError> {
        let row: Option<MagicLinkRow> = sqlx::query_as(
            r#"
            SELECT id, email, token, expires_at, used, created_at
            FROM magic_link_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find magic link: {}", e)))?;

        row.map(MagicLinkToken::try_from).transpose()
    }

    async fn mark_used(&self, id: &MagicLinkTokenId) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE magic_link_tokens SET used = TRUE
            WHERE id = $1 AND used = FALSE
            "#,
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to consume magic link: {}", e)))?;

        Ok(result.rows_affected() == 1)
    }
}
