//! Axum router configuration for sign-in endpoints.

use axum::{routing::post, Router};

use super::handlers::{password_login, request_magic_link, set_password, verify_magic_link};
use crate::adapters::http::state::AppState;

/// Create the auth router, mounted at `/api/auth`.
///
/// # Routes
///
/// - `POST /magic-link` - Request a sign-in link
/// - `POST /magic-link/verify` - Redeem a link token
/// - `POST /login` - Password sign-in
/// - `POST /password` - Set the caller's password (session required)
pub fn identity_routes() -> Router<AppState> {
    Router::new()
        .route("/magic-link", post(request_magic_link))
        .route("/magic-link/verify", post(verify_magic_link))
        .route("/login", post(password_login))
        .route("/password", post(set_password))
}
