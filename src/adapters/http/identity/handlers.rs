//! HTTP handlers for magic-link and password sign-in.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use super::dto::{
    MagicLinkRequest, MagicLinkResponse, PasswordLoginRequest, SessionResponse,
    SetPasswordRequest, VerifyMagicLinkRequest,
};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::identity::{
    RequestMagicLinkCommand, SetPasswordCommand, SignInCommand,
};
use crate::domain::foundation::EmailAddress;
use crate::domain::identity::{Credential, IdentityError};

/// POST /api/auth/magic-link - Email a single-use sign-in link
pub async fn request_magic_link(
    State(state): State<AppState>,
    Json(req): Json<MagicLinkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .request_magic_link_handler()
        .handle(RequestMagicLinkCommand { email: req.email })
        .await?;

    Ok(Json(MagicLinkResponse {
        message: "Magic link sent. Check your email to sign in.".to_string(),
        debug_link: result.debug_link,
    }))
}

/// POST /api/auth/magic-link/verify - Redeem a token for a session
pub async fn verify_magic_link(
    State(state): State<AppState>,
    Json(req): Json<VerifyMagicLinkRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .sign_in_handler()
        .handle(SignInCommand {
            credential: Credential::MagicLink { token: req.token },
        })
        .await?;

    Ok(Json(SessionResponse::new(&result.user, result.session)))
}

/// POST /api/auth/login - Email and password sign-in
pub async fn password_login(
    State(state): State<AppState>,
    Json(req): Json<PasswordLoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // An unparseable address cannot match an account.
    let email = EmailAddress::parse(&req.email).map_err(|_| IdentityError::InvalidCredentials)?;

    let result = state
        .sign_in_handler()
        .handle(SignInCommand {
            credential: Credential::Password {
                email,
                password: req.password,
            },
        })
        .await?;

    Ok(Json(SessionResponse::new(&result.user, result.session)))
}

/// POST /api/auth/password - Set or replace the caller's password
pub async fn set_password(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<SetPasswordRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .set_password_handler()
        .handle(SetPasswordCommand {
            user_id: user.id,
            password: req.password,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
