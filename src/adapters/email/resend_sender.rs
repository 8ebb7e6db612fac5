//! Resend email adapter for sign-in links.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::domain::foundation::EmailAddress;
use crate::ports::{DeliveryError, MagicLinkSender};

const DEFAULT_API_BASE_URL: &str = "https://api.resend.com";

/// Resend API configuration.
#[derive(Clone)]
pub struct ResendConfig {
    api_key: SecretString,
    from: String,
    api_base_url: String,
    timeout: Duration,
}

impl ResendConfig {
    /// `from` is a full header value, e.g. `Quillpress <noreply@quillpress.app>`.
    pub fn new(api_key: SecretString, from: impl Into<String>) -> Self {
        Self {
            api_key,
            from: from.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: String,
    html: String,
}

/// Sends magic links through the Resend HTTP API.
pub struct ResendMagicLinkSender {
    config: ResendConfig,
    http_client: reqwest::Client,
}

impl ResendMagicLinkSender {
    pub fn new(config: ResendConfig) -> Result<Self, DeliveryError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl MagicLinkSender for ResendMagicLinkSender {
    async fn send(&self, to: &EmailAddress, link: &str) -> Result<(), DeliveryError> {
        let body = SendEmailBody {
            from: &self.config.from,
            to: [to.as_str()],
            subject: "Your Quillpress sign-in link",
            text: format!(
                "Sign in to Quillpress:\n\n{}\n\nThis link expires in 15 minutes and can be used once.",
                link
            ),
            html: format!(
                "<p>Sign in to Quillpress:</p><p><a href=\"{0}\">{0}</a></p>\
                 <p>This link expires in 15 minutes and can be used once.</p>",
                link
            ),
        };

        let response = self
            .http_client
            .post(format!("{}/emails", self.config.api_base_url))
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DeliveryError::Timeout
                } else {
                    DeliveryError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected(format!("{}: {}", status.as_u16(), detail)));
        }

        Ok(())
    }
}
