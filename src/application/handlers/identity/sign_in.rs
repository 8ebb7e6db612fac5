//! SignInHandler - exchanges a verified credential for a session token.
//!
//! Each credential kind is verified by its own `CredentialVerifier`; this
//! handler only dispatches and issues the session.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::ExposeSecret;

use crate::domain::foundation::AuthenticatedUser;
use crate::domain::identity::{Credential, CredentialKind, IdentityError, User};
use crate::ports::{CredentialVerifier, PasswordHasher, SessionIssuer, SessionToken, UserRepository};

/// Command to sign in with any supported credential.
#[derive(Debug, Clone)]
pub struct SignInCommand {
    pub credential: Credential,
}

/// Result of a successful sign-in.
#[derive(Debug, Clone)]
pub struct SignInResult {
    pub user: User,
    pub session: SessionToken,
}

pub struct SignInHandler {
    verifiers: Vec<Arc<dyn CredentialVerifier>>,
    sessions: Arc<dyn SessionIssuer>,
}

impl SignInHandler {
    pub fn new(verifiers: Vec<Arc<dyn CredentialVerifier>>, sessions: Arc<dyn SessionIssuer>) -> Self {
        Self {
            verifiers,
            sessions,
        }
    }

    pub async fn handle(&self, cmd: SignInCommand) -> Result<SignInResult, IdentityError> {
        let kind = cmd.credential.kind();
        let verifier = self
            .verifiers
            .iter()
            .find(|v| v.kind() == kind)
            .ok_or(IdentityError::InvalidCredentials)?;

        let user = match verifier.verify(cmd.credential).await {
            Ok(user) => user,
            Err(err) => {
                if err.is_authentication_failure() {
                    tracing::info!(credential = %kind, reason = %err.code(), "Sign-in rejected");
                }
                return Err(err);
            }
        };

        let identity = AuthenticatedUser::new(user.id, user.email.as_str(), user.username.clone());
        let session = self
            .sessions
            .issue(&identity)
            .await
            .map_err(|e| IdentityError::infrastructure(e.to_string()))?;

        tracing::info!(credential = %kind, user_id = %user.id, "Signed in");

        Ok(SignInResult { user, session })
    }
}

/// Verifies email and password against the stored Argon2 hash.
pub struct PasswordCredentialVerifier {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl PasswordCredentialVerifier {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl CredentialVerifier for PasswordCredentialVerifier {
    fn kind(&self) -> CredentialKind {
        CredentialKind::Password
    }

    async fn verify(&self, credential: Credential) -> Result<User, IdentityError> {
        let Credential::Password { email, password } = credential else {
            return Err(IdentityError::InvalidCredentials);
        };

        // Unknown address and missing hash are indistinguishable from a wrong password.
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;
        let hash = user
            .password_hash
            .clone()
            .ok_or(IdentityError::InvalidCredentials)?;

        let hasher = self.hasher.clone();
        let matches = tokio::task::spawn_blocking(move || {
            hasher.verify(password.expose_secret(), &hash)
        })
        .await
        .map_err(|e| IdentityError::infrastructure(format!("hash task failed: {}", e)))??;

        if matches {
            Ok(user)
        } else {
            Err(IdentityError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::foundation::{AuthError, DomainError, EmailAddress, Timestamp};
    use secrecy::SecretString;

    // ══════════════════════════════════════════════════════════════
    // Test Doubles
    // ══════════════════════════════════════════════════════════════

    /// Stores the password verbatim behind a prefix.
    struct PlainHasher;

    impl PasswordHasher for PlainHasher {
        fn hash(&self, password: &str) -> Result<String, DomainError> {
            Ok(format!("plain${}", password))
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
            Ok(hash == format!("plain${}", password))
        }
    }

    struct StaticSessions;

    #[async_trait]
    impl SessionIssuer for StaticSessions {
        async fn issue(&self, user: &AuthenticatedUser) -> Result<SessionToken, AuthError> {
            Ok(SessionToken {
                token: format!("session-for-{}", user.id),
                expires_at: Timestamp::now().plus_minutes(60),
            })
        }
    }

    fn alice() -> User {
        let mut user = User::provision(
            EmailAddress::parse("alice@example.com").unwrap(),
            "alice_010203".to_string(),
            Timestamp::now(),
        );
        user.set_password_hash("plain$hunter2", Timestamp::now());
        user
    }

    fn handler(users: Arc<InMemoryUserRepository>) -> SignInHandler {
        let password = Arc::new(PasswordCredentialVerifier::new(users, Arc::new(PlainHasher)));
        SignInHandler::new(vec![password], Arc::new(StaticSessions))
    }

    fn password(email: &str, pw: &str) -> SignInCommand {
        SignInCommand {
            credential: Credential::Password {
                email: EmailAddress::parse(email).unwrap(),
                password: SecretString::new(pw.to_string()),
            },
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Password Sign-in
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn correct_password_issues_session() {
        let user = alice();
        let users = Arc::new(InMemoryUserRepository::with_users([user.clone()]));

        let result = handler(users)
            .handle(password("alice@example.com", "hunter2"))
            .await
            .unwrap();

        assert_eq!(result.user.id, user.id);
        assert_eq!(result.session.token, format!("session-for-{}", user.id));
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let users = Arc::new(InMemoryUserRepository::with_users([alice()]));
        let err = handler(users)
            .handle(password("alice@example.com", "nope"))
            .await
            .unwrap_err();
        assert_eq!(err, IdentityError::InvalidCredentials);
    }

    #[tokio::test]
    async fn unknown_email_is_invalid_credentials() {
        let users = Arc::new(InMemoryUserRepository::with_users([alice()]));
        let err = handler(users)
            .handle(password("mallory@example.com", "hunter2"))
            .await
            .unwrap_err();
        assert_eq!(err, IdentityError::InvalidCredentials);
    }

    #[tokio::test]
    async fn account_without_password_is_invalid_credentials() {
        let mut user = alice();
        user.password_hash = None;
        let users = Arc::new(InMemoryUserRepository::with_users([user]));
        let err = handler(users)
            .handle(password("alice@example.com", "hunter2"))
            .await
            .unwrap_err();
        assert_eq!(err, IdentityError::InvalidCredentials);
    }

    // ══════════════════════════════════════════════════════════════
    // Dispatch
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn credential_without_verifier_is_rejected() {
        let users = Arc::new(InMemoryUserRepository::new());
        let err = handler(users)
            .handle(SignInCommand {
                credential: Credential::MagicLink {
                    token: "0".repeat(64),
                },
            })
            .await
            .unwrap_err();
        assert_eq!(err, IdentityError::InvalidCredentials);
    }
}
