//! Session ports: issuing a token after sign-in and validating it on later
//! requests.
//!
//! # Contract
//!
//! Validators must:
//! - Verify the token signature
//! - Reject expired tokens with `AuthError::TokenExpired`
//! - Reject malformed or forged tokens with `AuthError::InvalidToken`

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp};

/// Validates session tokens and extracts the caller's identity.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

/// Issues session tokens for a verified identity.
#[async_trait]
pub trait SessionIssuer: Send + Sync {
    async fn issue(&self, user: &AuthenticatedUser) -> Result<SessionToken, AuthError>;
}

/// A signed session token handed to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub token: String,
    pub expires_at: Timestamp,
}
