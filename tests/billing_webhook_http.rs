//! Billing webhook endpoint: signature gate and entitlement transitions.

mod common;

use axum::http::StatusCode;

use common::{subscription_event, TestApp, TestAppBuilder};
use quillpress::adapters::memory::{InMemoryArticleRepository, InMemoryUserRepository};
use quillpress::domain::foundation::{EmailAddress, Timestamp};
use quillpress::domain::identity::User;
use quillpress::domain::publishing::Article;

fn bob() -> User {
    User::provision(
        EmailAddress::parse("bob@example.com").unwrap(),
        "bob_0a0b0c".to_string(),
        Timestamp::now(),
    )
}

fn app_with(user: &User) -> TestApp {
    TestAppBuilder::new()
        .users(InMemoryUserRepository::with_users([user.clone()]))
        .build()
}

// =============================================================================
// Signature Gate
// =============================================================================

#[tokio::test]
async fn mismatched_signature_is_rejected_without_state_change() {
    let user = bob();
    let app = app_with(&user);
    let body = subscription_event("subscription.active", &user, "sub_1");

    let (status, response) = app.post_webhook(&body, Some("v1,AAAA==")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["code"], "INVALID_SIGNATURE");
    assert!(!app.stored_user(&user).await.is_paid);
}

#[tokio::test]
async fn missing_signature_header_is_rejected() {
    let user = bob();
    let app = app_with(&user);
    let body = subscription_event("subscription.active", &user, "sub_1");

    let (status, _) = app.post_webhook(&body, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(!app.stored_user(&user).await.is_paid);
}

#[tokio::test]
async fn signature_for_other_body_is_rejected() {
    let user = bob();
    let app = app_with(&user);
    let signed_for = subscription_event("subscription.active", &user, "sub_1");
    let verifier = quillpress::domain::entitlement::WebhookVerifier::new(
        secrecy::SecretString::new(common::WEBHOOK_SECRET.to_string()),
    );
    let sig = verifier
        .sign("msg_integration", "1700000000", &signed_for)
        .unwrap();
    let tampered = subscription_event("subscription.active", &user, "sub_2");

    let (status, _) = app
        .post_webhook(&tampered, Some(&format!("v1,{}", sig)))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Payload Handling
// =============================================================================

#[tokio::test]
async fn verified_non_json_is_bad_request() {
    let app = TestApp::new();

    let (status, _) = app.post_signed_webhook(b"not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recognised_event_without_user_is_bad_request() {
    let app = TestApp::new();
    let body = br#"{"type":"subscription.active","data":{"id":"sub_1","metadata":{}}}"#;

    let (status, _) = app.post_signed_webhook(body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unrecognised_event_is_acknowledged() {
    let user = bob();
    let app = app_with(&user);
    let body = subscription_event("order.created", &user, "ord_1");

    let (status, response) = app.post_signed_webhook(&body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["received"], true);
    assert!(!app.stored_user(&user).await.is_paid);
}

// =============================================================================
// Entitlement Transitions
// =============================================================================

#[tokio::test]
async fn active_then_canceled_round_trips_entitlement() {
    let user = bob();
    let app = app_with(&user);

    let (status, _) = app
        .post_signed_webhook(&subscription_event("subscription.active", &user, "sub_1"))
        .await;
    assert_eq!(status, StatusCode::OK);
    let paid = app.stored_user(&user).await;
    assert!(paid.is_paid);
    assert_eq!(paid.subscription_ref.as_deref(), Some("sub_1"));

    let (status, _) = app
        .post_signed_webhook(&subscription_event("subscription.canceled", &user, "sub_1"))
        .await;
    assert_eq!(status, StatusCode::OK);
    let free = app.stored_user(&user).await;
    assert!(!free.is_paid);
    assert!(free.subscription_ref.is_none());
}

#[tokio::test]
async fn duplicate_delivery_is_idempotent() {
    let user = bob();
    let app = app_with(&user);
    let body = subscription_event("subscription.active", &user, "sub_1");

    app.post_signed_webhook(&body).await;
    let once = app.stored_user(&user).await;
    let (status, _) = app.post_signed_webhook(&body).await;
    let twice = app.stored_user(&user).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(once, twice);
}

#[tokio::test]
async fn provider_cancellation_leaves_articles_published_by_default() {
    let t0 = Timestamp::now();
    let mut user = bob();
    user.activate_subscription("sub_1", t0);
    let a = Article::new(user.id, "A", t0);
    let b = Article::new(user.id, "B", t0.plus_secs(60));
    let app = TestAppBuilder::new()
        .users(InMemoryUserRepository::with_users([user.clone()]))
        .articles(InMemoryArticleRepository::with_articles([a.clone(), b.clone()]))
        .build();

    app.post_signed_webhook(&subscription_event("subscription.canceled", &user, "sub_1"))
        .await;

    assert!(!app.stored_user(&user).await.is_paid);
    assert!(app.articles.get(&a.id).unwrap().is_published());
    assert!(app.articles.get(&b.id).unwrap().is_published());
}

#[tokio::test]
async fn event_for_unknown_user_is_not_found() {
    let app = TestApp::new();
    let stranger = bob();

    let (status, _) = app
        .post_signed_webhook(&subscription_event("subscription.active", &stranger, "sub_1"))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
