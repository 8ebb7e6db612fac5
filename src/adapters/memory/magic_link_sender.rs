//! Recording magic-link sender for tests and local development.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::foundation::EmailAddress;
use crate::ports::{DeliveryError, MagicLinkSender};

/// A link captured by `RecordingMagicLinkSender`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentLink {
    pub to: String,
    pub link: String,
}

/// Keeps every link it is asked to send; can be told to fail or stall.
#[derive(Default)]
pub struct RecordingMagicLinkSender {
    sent: Mutex<Vec<SentLink>>,
    failure: Option<DeliveryError>,
    latency: Option<Duration>,
}

impl RecordingMagicLinkSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: DeliveryError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn sent(&self) -> Vec<SentLink> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Token query parameter from the most recent link.
    pub fn last_token(&self) -> Option<String> {
        self.sent()
            .last()
            .and_then(|s| s.link.split("token=").nth(1).map(str::to_string))
    }
}

#[async_trait]
impl MagicLinkSender for RecordingMagicLinkSender {
    async fn send(&self, to: &EmailAddress, link: &str) -> Result<(), DeliveryError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let mut sent = self
            .sent
            .lock()
            .map_err(|_| DeliveryError::Transport("sender state poisoned".to_string()))?;
        sent.push(SentLink {
            to: to.to_string(),
            link: link.to_string(),
        });
        Ok(())
    }
}
