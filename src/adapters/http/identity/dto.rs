//! Request and response bodies for the sign-in endpoints.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::domain::identity::User;
use crate::ports::SessionToken;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct MagicLinkRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyMagicLinkRequest {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordLoginRequest {
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub password: SecretString,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicLinkResponse {
    pub message: String,
    /// Only present outside production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_link: Option<String>,
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_paid: bool,
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.to_string(),
            is_paid: user.is_paid,
            created_at: user.created_at.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: UserResponse,
    pub session_token: String,
    pub expires_at: String,
}

impl SessionResponse {
    pub fn new(user: &User, session: SessionToken) -> Self {
        Self {
            user: UserResponse::from(user),
            session_token: session.token,
            expires_at: session.expires_at.to_string(),
        }
    }
}
