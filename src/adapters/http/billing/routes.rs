//! Axum router configuration for billing endpoints.

use axum::{routing::post, Router};

use super::handlers::{cancel_subscription, create_checkout, handle_billing_webhook};
use crate::adapters::http::state::AppState;

/// Session-authenticated billing routes, mounted at `/api/billing`.
///
/// - `POST /checkout` - Start checkout
/// - `POST /cancel` - Cancel subscription
pub fn billing_routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", post(create_checkout))
        .route("/cancel", post(cancel_subscription))
}

/// Provider webhook routes, mounted at `/api/webhooks`.
///
/// Separate from `billing_routes` because webhooks carry no session; they
/// are verified by signature.
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/billing", post(handle_billing_webhook))
}
