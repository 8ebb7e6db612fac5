//! Email configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Email configuration (Resend)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key; without one, links are only logged (not allowed in production)
    pub resend_api_key: Option<String>,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Delivery timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn resend_api_key(&self) -> Option<SecretString> {
        self.resend_api_key
            .as_ref()
            .filter(|k| !k.is_empty())
            .map(|k| SecretString::new(k.clone()))
    }

    /// Validate email configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        match self.resend_api_key.as_deref() {
            None | Some("") if *environment == Environment::Production => {
                return Err(ValidationError::MissingRequired("EMAIL__RESEND_API_KEY"));
            }
            Some(key) if !key.is_empty() && !key.starts_with("re_") => {
                return Err(ValidationError::InvalidResendKey);
            }
            _ => {}
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            from_email: default_from_email(),
            from_name: default_from_name(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_from_email() -> String {
    "noreply@quillpress.app".to_string()
}

fn default_from_name() -> String {
    "Quillpress".to_string()
}

fn default_timeout() -> u64 {
    10
}
