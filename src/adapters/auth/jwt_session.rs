//! HS256 session tokens.
//!
//! Implements both `SessionIssuer` and `SessionValidator` with a single
//! shared secret. Claims carry the user id, email and username so request
//! handling never needs a database round trip to identify the caller.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp, UserId};
use crate::ports::{SessionIssuer, SessionToken, SessionValidator};

/// Configuration for session signing.
#[derive(Clone)]
pub struct JwtSessionConfig {
    pub secret: SecretString,
    /// Value of the `iss` claim, checked on validation.
    pub issuer: String,
    pub ttl: Duration,
}

impl JwtSessionConfig {
    pub fn new(secret: SecretString, issuer: impl Into<String>) -> Self {
        Self {
            secret,
            issuer: issuer.into(),
            ttl: Duration::from_secs(60 * 60 * 24 * 7),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    iss: String,
    exp: i64,
    iat: i64,
    email: String,
    username: String,
}

/// Signs and validates session JWTs.
pub struct JwtSessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl JwtSessionService {
    pub fn new(config: JwtSessionConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: config.issuer,
            ttl: config.ttl,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation
    }
}

#[async_trait]
impl SessionIssuer for JwtSessionService {
    async fn issue(&self, user: &AuthenticatedUser) -> Result<SessionToken, AuthError> {
        let now = Timestamp::now();
        let ttl_secs = i64::try_from(self.ttl.as_secs())
            .map_err(|_| AuthError::service_unavailable("session ttl out of range"))?;
        let expires_at = now.plus_secs(ttl_secs);

        let claims = SessionClaims {
            sub: user.id.to_string(),
            iss: self.issuer.clone(),
            exp: expires_at.as_unix_secs(),
            iat: now.as_unix_secs(),
            email: user.email.clone(),
            username: user.username.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::service_unavailable(format!("failed to sign session: {}", e)))?;

        Ok(SessionToken { token, expires_at })
    }
}

#[async_trait]
impl SessionValidator for JwtSessionService {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Session expired");
                        AuthError::TokenExpired
                    }
                    _ => {
                        tracing::debug!("Session validation failed: {}", e);
                        AuthError::InvalidToken
                    }
                }
            })?;

        let claims = data.claims;
        let user_id: UserId = claims.sub.parse().map_err(|_| {
            tracing::warn!("Session subject is not a user id");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(user_id, claims.email, claims.username))
    }
}

impl std::fmt::Debug for JwtSessionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionService")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
