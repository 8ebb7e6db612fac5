//! Shared harness: the full axum router over in-memory adapters.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use quillpress::adapters::auth::{Argon2PasswordHasher, JwtSessionConfig, JwtSessionService};
use quillpress::adapters::billing::MockPaymentProvider;
use quillpress::adapters::http::billing::{
    WEBHOOK_ID_HEADER, WEBHOOK_SIGNATURE_HEADER, WEBHOOK_TIMESTAMP_HEADER,
};
use quillpress::adapters::http::{api_router, AppState};
use quillpress::adapters::memory::{
    InMemoryArticleRepository, InMemoryMagicLinkRepository, InMemoryUserRepository,
    RecordingMagicLinkSender,
};
use quillpress::application::{CheckoutSettings, MagicLinkSettings};
use quillpress::domain::entitlement::WebhookVerifier;
use quillpress::domain::foundation::{AuthenticatedUser, Timestamp};
use quillpress::domain::identity::User;
use quillpress::ports::{ManualClock, SessionIssuer};

pub const WEBHOOK_SECRET: &str = "whsec_integration_secret";

pub struct TestApp {
    pub users: Arc<InMemoryUserRepository>,
    pub magic_links: Arc<InMemoryMagicLinkRepository>,
    pub articles: Arc<InMemoryArticleRepository>,
    pub sender: Arc<RecordingMagicLinkSender>,
    pub payments: MockPaymentProvider,
    pub sessions: Arc<JwtSessionService>,
    pub clock: Arc<ManualClock>,
    pub router: Router,
}

pub struct TestAppBuilder {
    users: Arc<InMemoryUserRepository>,
    articles: Arc<InMemoryArticleRepository>,
    payments: MockPaymentProvider,
    production: bool,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            articles: Arc::new(InMemoryArticleRepository::new()),
            payments: MockPaymentProvider::new(),
            production: false,
        }
    }

    pub fn users(mut self, users: InMemoryUserRepository) -> Self {
        self.users = Arc::new(users);
        self
    }

    pub fn articles(mut self, articles: InMemoryArticleRepository) -> Self {
        self.articles = Arc::new(articles);
        self
    }

    pub fn payments(mut self, payments: MockPaymentProvider) -> Self {
        self.payments = payments;
        self
    }

    pub fn production(mut self) -> Self {
        self.production = true;
        self
    }

    pub fn build(self) -> TestApp {
        let magic_links = Arc::new(InMemoryMagicLinkRepository::new());
        let sender = Arc::new(RecordingMagicLinkSender::new());
        let sessions = Arc::new(JwtSessionService::new(JwtSessionConfig::new(
            SecretString::new("integration-session-secret-0123456789".to_string()),
            "quillpress",
        )));
        let clock = Arc::new(ManualClock::new(Timestamp::now()));

        let state = AppState {
            users: self.users.clone(),
            magic_links: magic_links.clone(),
            articles: self.articles.clone(),
            magic_link_sender: sender.clone(),
            payment_provider: Arc::new(self.payments.clone()),
            session_issuer: sessions.clone(),
            session_validator: sessions.clone(),
            password_hasher: Arc::new(Argon2PasswordHasher::new()),
            clock: clock.clone(),
            webhook_verifier: Arc::new(WebhookVerifier::new(SecretString::new(
                WEBHOOK_SECRET.to_string(),
            ))),
            magic_link: MagicLinkSettings::new("https://quillpress.test", self.production)
                .with_delivery_timeout(Duration::from_millis(200)),
            checkout: CheckoutSettings {
                product_id: "prod_pro".to_string(),
                success_url: "https://quillpress.test/billing/success".to_string(),
                timeout: Duration::from_millis(200),
            },
            revoke_timeout: Duration::from_millis(200),
            lock_on_provider_cancellation: false,
        };

        TestApp {
            users: self.users,
            magic_links,
            articles: self.articles,
            sender,
            payments: self.payments,
            sessions,
            clock,
            router: api_router(state),
        }
    }
}

impl TestApp {
    pub fn new() -> Self {
        TestAppBuilder::new().build()
    }

    /// Session token for an existing user, bypassing sign-in.
    pub async fn session_for(&self, user: &User) -> String {
        let identity =
            AuthenticatedUser::new(user.id, user.email.as_str(), user.username.clone());
        self.sessions.issue(&identity).await.unwrap().token
    }

    pub async fn post_json(&self, path: &str, body: Value, bearer: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json");
        if let Some(token) = bearer {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Posts a raw webhook body with the given signature header.
    pub async fn post_webhook(&self, body: &[u8], signature: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/webhooks/billing")
            .header(WEBHOOK_ID_HEADER, "msg_integration")
            .header(WEBHOOK_TIMESTAMP_HEADER, "1700000000");
        if let Some(sig) = signature {
            builder = builder.header(WEBHOOK_SIGNATURE_HEADER, sig);
        }
        self.send(builder.body(Body::from(body.to_vec())).unwrap())
            .await
    }

    /// Posts a webhook body signed with the shared secret.
    pub async fn post_signed_webhook(&self, body: &[u8]) -> (StatusCode, Value) {
        let verifier = WebhookVerifier::new(SecretString::new(WEBHOOK_SECRET.to_string()));
        let sig = verifier
            .sign("msg_integration", "1700000000", body)
            .unwrap();
        self.post_webhook(body, Some(&format!("v1,{}", sig))).await
    }

    pub async fn stored_user(&self, user: &User) -> User {
        use quillpress::ports::UserRepository;
        self.users.find_by_id(&user.id).await.unwrap().unwrap()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

pub fn subscription_event(event_type: &str, user: &User, subscription_id: &str) -> Vec<u8> {
    serde_json::json!({
        "type": event_type,
        "data": {
            "id": subscription_id,
            "metadata": {
                "userId": user.id.to_string(),
                "email": user.email.as_str(),
            }
        }
    })
    .to_string()
    .into_bytes()
}
