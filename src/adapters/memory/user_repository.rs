//! In-memory user repository.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EmailAddress, ErrorCode, UserId};
use crate::domain::identity::User;
use crate::ports::UserRepository;

use super::lock_poisoned;

/// Stores users in a map; uniqueness is checked under the same lock as the insert.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: Mutex::new(users.into_iter().map(|u| (u.id, u)).collect()),
        }
    }

    pub fn count(&self) -> usize {
        self.users.lock().map(|u| u.len()).unwrap_or(0)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().map_err(|_| lock_poisoned())?;
        Ok(users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().map_err(|_| lock_poisoned())?;
        Ok(users.values().find(|u| &u.email == email).cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.lock().map_err(|_| lock_poisoned())?;
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::new(ErrorCode::EmailTaken, "email already registered"));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(DomainError::new(ErrorCode::UsernameTaken, "username already taken"));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_entitlement(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.lock().map_err(|_| lock_poisoned())?;
        let stored = users
            .get_mut(&user.id)
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "user not found"))?;
        stored.is_paid = user.is_paid;
        stored.subscription_ref = user.subscription_ref.clone();
        stored.updated_at = user.updated_at;
        Ok(())
    }

    async fn update_password(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.lock().map_err(|_| lock_poisoned())?;
        let stored = users
            .get_mut(&user.id)
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "user not found"))?;
        stored.password_hash = user.password_hash.clone();
        stored.updated_at = user.updated_at;
        Ok(())
    }
}
