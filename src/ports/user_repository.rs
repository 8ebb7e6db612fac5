//! User repository port.
//!
//! Users are created by magic-link redemption. Afterwards only their
//! entitlement fields and password hash are rewritten.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EmailAddress, UserId};
use crate::domain::identity::User;

/// Persistence for user accounts.
///
/// # Contract
///
/// - `email` and `username` are unique
/// - `insert` fails with `ErrorCode::EmailTaken` or `ErrorCode::UsernameTaken`
///   when the corresponding constraint rejects the row
/// - `update_entitlement` writes only `is_paid`, `subscription_ref`, `updated_at`
/// - `update_password` writes only `password_hash`, `updated_at`
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, DomainError>;

    async fn insert(&self, user: &User) -> Result<(), DomainError>;

    /// Persists the entitlement fields of `user`.
    ///
    /// Returns `ErrorCode::UserNotFound` if no row matched.
    async fn update_entitlement(&self, user: &User) -> Result<(), DomainError>;

    /// Persists the password hash of `user`.
    ///
    /// Returns `ErrorCode::UserNotFound` if no row matched.
    async fn update_password(&self, user: &User) -> Result<(), DomainError>;
}
