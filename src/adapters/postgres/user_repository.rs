//! PostgreSQL implementation of UserRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, Timestamp, UserId};
use crate::domain::identity::User;
use crate::ports::UserRepository;

/// Unique constraint on `users.email`.
const EMAIL_CONSTRAINT: &str = "users_email_key";
/// Unique constraint on `users.username`.
const USERNAME_CONSTRAINT: &str = "users_username_key";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    is_paid: bool,
    subscription_ref: Option<String>,
    password_hash: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = EmailAddress::parse(&row.email).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid stored email: {}", e))
        })?;
        Ok(User {
            id: UserId::from_uuid(row.id),
            username: row.username,
            email,
            is_paid: row.is_paid,
            subscription_ref: row.subscription_ref,
            password_hash: row.password_hash,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_USER: &str = r#"
    SELECT id, username, email, is_paid, subscription_ref, password_hash, created_at, updated_at
    FROM users
"#;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_USER))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to find user: {}", e)))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("{} WHERE email = $1", SELECT_USER))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to find user: {}", e)))?;

        row.map(User::try_from).transpose()
    }

    async fn insert(&self, user: &User) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, email, is_paid, subscription_ref, password_hash, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.username)
        .bind(user.email.as_str())
        .bind(user.is_paid)
        .bind(&user.subscription_ref)
        .bind(&user.password_hash)
        .bind(user.created_at.as_datetime())
        .bind(user.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                match db_err.constraint() {
                    Some(EMAIL_CONSTRAINT) => {
                        return DomainError::new(ErrorCode::EmailTaken, "Email already registered")
                    }
                    Some(USERNAME_CONSTRAINT) => {
                        return DomainError::new(ErrorCode::UsernameTaken, "Username already taken")
                    }
                    _ => {}
                }
            }
            DomainError::database(format!("Failed to insert user: {}", e))
        })?;

        Ok(())
    }

    async fn update_entitlement(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                is_paid = $2,
                subscription_ref = $3,
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.is_paid)
        .bind(&user.subscription_ref)
        .bind(user.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update user: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }

        Ok(())
    }

    async fn update_password(&self, user: &User) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                password_hash = $2,
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.password_hash)
        .bind(user.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to update password: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }

        Ok(())
    }
}
