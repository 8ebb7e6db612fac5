//! End-to-end sign-in flows through the HTTP router.

mod common;

use axum::http::StatusCode;
use futures::future::join_all;
use serde_json::json;

use common::{TestApp, TestAppBuilder};

const FIFTEEN_MINUTES: i64 = 15 * 60;

async fn request_link(app: &TestApp, email: &str) -> (StatusCode, serde_json::Value) {
    app.post_json("/api/auth/magic-link", json!({ "email": email }), None)
        .await
}

async fn verify(app: &TestApp, token: &str) -> (StatusCode, serde_json::Value) {
    app.post_json("/api/auth/magic-link/verify", json!({ "token": token }), None)
        .await
}

// =============================================================================
// Magic Link Lifecycle
// =============================================================================

#[tokio::test]
async fn expired_link_is_rejected_and_fresh_link_provisions_account() {
    let app = TestApp::new();

    let (status, body) = request_link(&app, "alice@example.com").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["debugLink"].as_str().unwrap().contains("token="));
    let stale = app.sender.last_token().unwrap();

    app.clock.advance_secs(FIFTEEN_MINUTES + 1);
    let (status, body) = verify(&app, &stale).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TOKEN_EXPIRED");
    assert_eq!(app.users.count(), 0);

    request_link(&app, "alice@example.com").await;
    let fresh = app.sender.last_token().unwrap();
    let (status, body) = verify(&app, &fresh).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["user"]["username"].as_str().unwrap().starts_with("alice_"));
    assert_eq!(body["user"]["email"], "alice@example.com");
    assert_eq!(body["user"]["isPaid"], false);
    assert!(!body["sessionToken"].as_str().unwrap().is_empty());
    assert_eq!(app.users.count(), 1);
}

#[tokio::test]
async fn second_redemption_is_already_used() {
    let app = TestApp::new();
    request_link(&app, "carol@example.com").await;
    let token = app.sender.last_token().unwrap();

    let (first, _) = verify(&app, &token).await;
    let (second, body) = verify(&app, &token).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TOKEN_ALREADY_USED");
}

#[tokio::test]
async fn link_redeems_one_second_before_expiry() {
    let app = TestApp::new();
    request_link(&app, "erin@example.com").await;
    let token = app.sender.last_token().unwrap();

    app.clock.advance_secs(FIFTEEN_MINUTES - 1);
    let (status, _) = verify(&app, &token).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_token_is_invalid() {
    let app = TestApp::new();

    let (status, body) = verify(&app, &"0".repeat(64)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[tokio::test]
async fn parallel_redemptions_have_exactly_one_winner() {
    let app = TestApp::new();
    request_link(&app, "race@example.com").await;
    let token = app.sender.last_token().unwrap();

    let attempts = (0..8).map(|_| verify(&app, &token));
    let statuses: Vec<StatusCode> = join_all(attempts)
        .await
        .into_iter()
        .map(|(status, _)| status)
        .collect();

    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::OK).count(), 1);
    assert_eq!(
        statuses
            .iter()
            .filter(|s| **s == StatusCode::UNAUTHORIZED)
            .count(),
        7
    );
    assert_eq!(app.users.count(), 1);
}

#[tokio::test]
async fn returning_user_keeps_account() {
    let app = TestApp::new();

    request_link(&app, "dana@example.com").await;
    let (_, first) = verify(&app, &app.sender.last_token().unwrap()).await;
    request_link(&app, "dana@example.com").await;
    let (_, second) = verify(&app, &app.sender.last_token().unwrap()).await;

    assert_eq!(first["user"]["id"], second["user"]["id"]);
    assert_eq!(app.users.count(), 1);
}

// =============================================================================
// Issuance Rules
// =============================================================================

#[tokio::test]
async fn production_never_returns_debug_link() {
    let app = TestAppBuilder::new().production().build();

    let (status, body) = request_link(&app, "alice@example.com").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.get("debugLink").is_none());
    assert_eq!(app.sender.sent().len(), 1);
}

#[tokio::test]
async fn malformed_email_is_validation_error() {
    let app = TestApp::new();

    let (status, body) = request_link(&app, "not-an-email").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(app.sender.sent().is_empty());
}

// =============================================================================
// Password Sign-In and Sessions
// =============================================================================

/// Signs up through a magic link and returns the session token.
async fn sign_up(app: &TestApp, email: &str) -> String {
    request_link(app, email).await;
    let (_, body) = verify(app, &app.sender.last_token().unwrap()).await;
    body["sessionToken"].as_str().unwrap().to_string()
}

async fn login(app: &TestApp, email: &str, password: &str) -> (StatusCode, serde_json::Value) {
    app.post_json(
        "/api/auth/login",
        json!({ "email": email, "password": password }),
        None,
    )
    .await
}

#[tokio::test]
async fn password_set_after_magic_link_enables_login() {
    let app = TestApp::new();
    let session = sign_up(&app, "frank@example.com").await;

    let (status, _) = app
        .post_json(
            "/api/auth/password",
            json!({ "password": "correct horse" }),
            Some(&session),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = login(&app, "frank@example.com", "correct horse").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "frank@example.com");
    assert!(!body["sessionToken"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new();
    let session = sign_up(&app, "frank@example.com").await;
    app.post_json(
        "/api/auth/password",
        json!({ "password": "correct horse" }),
        Some(&session),
    )
    .await;

    let (status, body) = login(&app, "frank@example.com", "battery staple").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn passwordless_account_cannot_log_in() {
    let app = TestApp::new();
    sign_up(&app, "frank@example.com").await;

    let (status, _) = login(&app, "frank@example.com", "anything at all").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn setting_password_requires_session() {
    let app = TestApp::new();

    let (status, _) = app
        .post_json("/api/auth/password", json!({ "password": "correct horse" }), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn short_password_is_rejected() {
    let app = TestApp::new();
    let session = sign_up(&app, "frank@example.com").await;

    let (status, body) = app
        .post_json("/api/auth/password", json!({ "password": "short" }), Some(&session))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn session_from_magic_link_authorizes_checkout() {
    let app = TestApp::new();
    request_link(&app, "gina@example.com").await;
    let (_, body) = verify(&app, &app.sender.last_token().unwrap()).await;
    let session = body["sessionToken"].as_str().unwrap().to_string();

    let (status, body) = app
        .post_json("/api/billing/checkout", json!({}), Some(&session))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["checkoutUrl"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn checkout_without_session_is_unauthorized() {
    let app = TestApp::new();

    let (status, _) = app.post_json("/api/billing/checkout", json!({}), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
