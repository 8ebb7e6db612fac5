//! Development sender that only logs.

use async_trait::async_trait;

use crate::domain::foundation::EmailAddress;
use crate::ports::{DeliveryError, MagicLinkSender};

/// Logs that a link would have been sent. Used when no email provider is
/// configured; the link itself reaches the developer through the debug link
/// in the API response.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMagicLinkSender;

#[async_trait]
impl MagicLinkSender for LogMagicLinkSender {
    async fn send(&self, to: &EmailAddress, _link: &str) -> Result<(), DeliveryError> {
        tracing::info!(to = %to.redacted(), "Email delivery disabled; magic link not sent");
        Ok(())
    }
}
