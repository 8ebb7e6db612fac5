//! HTTP adapters - REST API implementations.
//!
//! Each module exposes its routes; `api_router` mounts them under `/api`
//! behind the session middleware.

pub mod billing;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod publishing;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

use axum::{middleware::from_fn_with_state, routing::get, Router};

/// Complete API router with state applied.
///
/// # Mounts
///
/// - `/api/auth` - sign-in
/// - `/api/billing` - checkout and cancellation (session)
/// - `/api/webhooks` - provider webhooks (signature)
/// - `/api/articles` - republish (session)
/// - `/health` - liveness
pub fn api_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", identity::identity_routes())
        .nest("/billing", billing::billing_routes())
        .nest("/webhooks", billing::webhook_routes())
        .nest("/articles", publishing::publishing_routes());

    Router::new()
        .nest("/api", api)
        .route("/health", get(|| async { "ok" }))
        .layer(from_fn_with_state(
            state.session_validator.clone(),
            middleware::auth_middleware,
        ))
        .with_state(state)
}
