//! SetPasswordHandler - attaches a password to an existing account.
//!
//! Accounts are created passwordless by magic-link redemption. A signed-in
//! user may add or replace a password afterwards, which enables
//! `Credential::Password` sign-in.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use crate::domain::foundation::{ErrorCode, UserId};
use crate::domain::identity::IdentityError;
use crate::ports::{Clock, PasswordHasher, UserRepository};

/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;

/// Longest accepted password, in characters. Bounds hashing cost.
pub const MAX_PASSWORD_CHARS: usize = 128;

#[derive(Debug, Clone)]
pub struct SetPasswordCommand {
    pub user_id: UserId,
    pub password: SecretString,
}

pub struct SetPasswordHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl SetPasswordHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }

    pub async fn handle(&self, cmd: SetPasswordCommand) -> Result<(), IdentityError> {
        let length = cmd.password.expose_secret().chars().count();
        if length < MIN_PASSWORD_CHARS {
            return Err(IdentityError::validation(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_CHARS),
            ));
        }
        if length > MAX_PASSWORD_CHARS {
            return Err(IdentityError::validation(
                "password",
                format!("must be at most {} characters", MAX_PASSWORD_CHARS),
            ));
        }

        // A valid session for a vanished account is treated as a bad credential.
        let mut user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        let hasher = self.hasher.clone();
        let password = cmd.password;
        let hash = tokio::task::spawn_blocking(move || hasher.hash(password.expose_secret()))
            .await
            .map_err(|e| IdentityError::infrastructure(format!("hash task failed: {}", e)))??;

        user.set_password_hash(hash, self.clock.now());
        self.users.update_password(&user).await.map_err(|err| {
            if err.code == ErrorCode::UserNotFound {
                IdentityError::InvalidCredentials
            } else {
                err.into()
            }
        })?;

        tracing::info!(user_id = %user.id, "Password set");
        Ok(())
    }
}
