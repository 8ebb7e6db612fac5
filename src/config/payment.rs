//! Payment configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Billing provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Provider API key
    pub api_key: String,

    /// Shared secret for webhook signatures
    pub webhook_secret: String,

    /// Provider API base URL
    pub api_base_url: String,

    /// Product purchased at checkout
    pub product_id: String,

    /// Redirect after a completed checkout
    pub success_url: String,

    /// Timeout for checkout and revoke calls, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Reject webhooks whose timestamp is further than this from now
    pub webhook_tolerance_secs: Option<i64>,

    /// Also lock articles when the provider reports a cancellation
    #[serde(default)]
    pub lock_on_provider_cancellation: bool,
}

impl PaymentConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn api_key(&self) -> SecretString {
        SecretString::new(self.api_key.clone())
    }

    pub fn webhook_secret(&self) -> SecretString {
        SecretString::new(self.webhook_secret.clone())
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__API_KEY"));
        }
        if self.webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__WEBHOOK_SECRET"));
        }
        if self.api_base_url.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__API_BASE_URL"));
        }
        if self.product_id.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__PRODUCT_ID"));
        }
        if self.success_url.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__SUCCESS_URL"));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 60 {
            return Err(ValidationError::InvalidTimeout);
        }
        if matches!(self.webhook_tolerance_secs, Some(secs) if secs <= 0) {
            return Err(ValidationError::InvalidWebhookTolerance);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            webhook_secret: String::new(),
            api_base_url: String::new(),
            product_id: String::new(),
            success_url: String::new(),
            request_timeout_secs: default_request_timeout(),
            webhook_tolerance_secs: None,
            lock_on_provider_cancellation: false,
        }
    }
}

fn default_request_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PaymentConfig {
        PaymentConfig {
            api_key: "pk_live_abc".to_string(),
            webhook_secret: "whsec_xyz".to_string(),
            api_base_url: "https://billing.example.com".to_string(),
            product_id: "prod_pro".to_string(),
            success_url: "https://quillpress.app/billing/success".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid().validate().is_ok());
        assert!(!valid().lock_on_provider_cancellation);
    }

    #[test]
    fn test_validation_missing_api_key() {
        let config = PaymentConfig::default();
        assert_eq!(
            config.validate().unwrap_err(),
            ValidationError::MissingRequired("PAYMENT__API_KEY")
        );
    }

    #[test]
    fn test_validation_missing_webhook_secret() {
        let config = PaymentConfig {
            webhook_secret: String::new(),
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = PaymentConfig {
            request_timeout_secs: 0,
            ..valid()
        };
        assert_eq!(config.validate().unwrap_err(), ValidationError::InvalidTimeout);
    }

    #[test]
    fn test_validation_negative_tolerance() {
        let config = PaymentConfig {
            webhook_tolerance_secs: Some(-5),
            ..valid()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            ValidationError::InvalidWebhookTolerance
        );
    }
}
