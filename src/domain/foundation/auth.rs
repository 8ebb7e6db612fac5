//! Authentication types for the domain layer.
//!
//! `AuthenticatedUser` is the request-scoped identity. The HTTP middleware
//! builds it from a validated session token and inserts it into request
//! extensions; handlers receive it explicitly and never look it up from
//! ambient state.

use super::UserId;
use thiserror::Error;

/// Identity of the caller for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The user's primary key.
    pub id: UserId,

    /// Email the session was issued for.
    pub email: String,

    /// Public handle.
    pub username: String,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, email: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            username: username.into(),
        }
    }
}

/// Errors raised while validating or issuing a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The session token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The session could not be signed or verified for operational reasons.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}
