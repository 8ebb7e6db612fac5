//! Authentication configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Shortest accepted session signing secret.
const MIN_SESSION_SECRET_BYTES: usize = 32;

/// Sign-in links and session tokens
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Public base URL magic links point at
    pub app_base_url: String,

    /// HS256 session signing secret
    pub session_secret: String,

    /// `iss` claim of issued sessions
    #[serde(default = "default_session_issuer")]
    pub session_issuer: String,

    /// Session lifetime in seconds
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

impl AuthConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn session_secret(&self) -> SecretString {
        SecretString::new(self.session_secret.clone())
    }

    /// Validate authentication configuration
    ///
    /// Production links must be HTTPS.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.app_base_url.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__APP_BASE_URL"));
        }
        if self.session_secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__SESSION_SECRET"));
        }
        if self.session_secret.len() < MIN_SESSION_SECRET_BYTES {
            return Err(ValidationError::SessionSecretTooShort(
                MIN_SESSION_SECRET_BYTES,
            ));
        }
        if *environment == Environment::Production && !self.app_base_url.starts_with("https://") {
            return Err(ValidationError::MustBeHttps("AUTH__APP_BASE_URL"));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            app_base_url: String::new(),
            session_secret: String::new(),
            session_issuer: default_session_issuer(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

fn default_session_issuer() -> String {
    "quillpress".to_string()
}

fn default_session_ttl() -> u64 {
    60 * 60 * 24 * 7
}
