//! Outbound delivery of sign-in links.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::EmailAddress;

/// Why a link could not be delivered.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    #[error("Delivery timed out")]
    Timeout,

    #[error("Delivery rejected: {0}")]
    Rejected(String),

    #[error("Delivery transport error: {0}")]
    Transport(String),
}

/// Sends a sign-in link to an address.
#[async_trait]
pub trait MagicLinkSender: Send + Sync {
    async fn send(&self, to: &EmailAddress, link: &str) -> Result<(), DeliveryError>;
}
