//! HTTP handlers for checkout, cancellation and provider webhooks.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};

use super::dto::{CancelResponse, CheckoutResponse, WebhookAck};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::entitlement::{
    CancelSubscriptionCommand, CreateCheckoutCommand, HandleBillingWebhookCommand,
};

pub const WEBHOOK_ID_HEADER: &str = "webhook-id";
pub const WEBHOOK_TIMESTAMP_HEADER: &str = "webhook-timestamp";
pub const WEBHOOK_SIGNATURE_HEADER: &str = "webhook-signature";

/// POST /api/billing/checkout - Start a paid-plan checkout
pub async fn create_checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .checkout_handler()
        .handle(CreateCheckoutCommand { user_id: user.id })
        .await?;

    Ok(Json(CheckoutResponse {
        checkout_url: result.checkout_url,
    }))
}

/// POST /api/billing/cancel - Cancel the caller's subscription
pub async fn cancel_subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let result = state
        .cancel_subscription_handler()
        .handle(CancelSubscriptionCommand { user_id: user.id })
        .await?;

    Ok(Json(CancelResponse::new(&result.locked)))
}

/// POST /api/webhooks/billing - Signed subscription events from the provider
///
/// The body is taken as raw bytes; the signature covers them exactly.
pub async fn handle_billing_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    };

    let cmd = HandleBillingWebhookCommand {
        webhook_id: header(WEBHOOK_ID_HEADER),
        webhook_timestamp: header(WEBHOOK_TIMESTAMP_HEADER),
        webhook_signature: header(WEBHOOK_SIGNATURE_HEADER),
        body: body.to_vec(),
    };

    state.webhook_handler().handle(cmd).await?;

    Ok(Json(WebhookAck { received: true }))
}
