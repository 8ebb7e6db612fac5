//! Quillpress API server.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use sqlx::PgPool;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quillpress::adapters::auth::{Argon2PasswordHasher, JwtSessionConfig, JwtSessionService};
use quillpress::adapters::billing::{BillingApiConfig, HttpBillingProvider};
use quillpress::adapters::email::{LogMagicLinkSender, ResendConfig, ResendMagicLinkSender};
use quillpress::adapters::http::{api_router, AppState};
use quillpress::adapters::postgres::{
    PostgresArticleRepository, PostgresMagicLinkRepository, PostgresUserRepository,
};
use quillpress::application::{CheckoutSettings, MagicLinkSettings};
use quillpress::config::AppConfig;
use quillpress::domain::entitlement::WebhookVerifier;
use quillpress::ports::{MagicLinkSender, SystemClock};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let pool = config.database.pool_options().connect(&config.database.url).await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Migrations applied");
    }

    let state = build_state(&config, pool)?;
    let app = api_router(state)
        .layer(DefaultBodyLimit::max(config.server.max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            MakeRequestUuid,
        ));

    let addr = config.server.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Quillpress listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.server.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_state(config: &AppConfig, pool: PgPool) -> Result<AppState, BoxError> {
    let sessions = Arc::new(JwtSessionService::new(
        JwtSessionConfig::new(config.auth.session_secret(), config.auth.session_issuer.clone())
            .with_ttl(config.auth.session_ttl()),
    ));

    let magic_link_sender: Arc<dyn MagicLinkSender> = match config.email.resend_api_key() {
        Some(api_key) => Arc::new(ResendMagicLinkSender::new(
            ResendConfig::new(api_key, config.email.from_header())
                .with_timeout(config.email.timeout()),
        )?),
        None => {
            tracing::warn!("No Resend API key configured; magic links will only be logged");
            Arc::new(LogMagicLinkSender)
        }
    };

    let payment_provider = Arc::new(HttpBillingProvider::new(
        BillingApiConfig::new(config.payment.api_key(), config.payment.api_base_url.clone())
            .with_timeout(config.payment.request_timeout()),
    )?);

    let mut webhook_verifier = WebhookVerifier::new(config.payment.webhook_secret());
    if let Some(secs) = config.payment.webhook_tolerance_secs {
        webhook_verifier = webhook_verifier.with_tolerance(secs);
    }

    Ok(AppState {
        users: Arc::new(PostgresUserRepository::new(pool.clone())),
        magic_links: Arc::new(PostgresMagicLinkRepository::new(pool.clone())),
        articles: Arc::new(PostgresArticleRepository::new(pool)),
        magic_link_sender,
        payment_provider,
        session_issuer: sessions.clone(),
        session_validator: sessions,
        password_hasher: Arc::new(Argon2PasswordHasher::new()),
        clock: Arc::new(SystemClock),
        webhook_verifier: Arc::new(webhook_verifier),
        magic_link: MagicLinkSettings::new(config.auth.app_base_url.clone(), config.is_production())
            .with_delivery_timeout(config.email.timeout()),
        checkout: CheckoutSettings {
            product_id: config.payment.product_id.clone(),
            success_url: config.payment.success_url.clone(),
            timeout: config.payment.request_timeout(),
        },
        revoke_timeout: config.payment.request_timeout(),
        lock_on_provider_cancellation: config.payment.lock_on_provider_cancellation,
    })
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer
    } else {
        layer.allow_origin(origins)
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
