//! Email adapters implementing `MagicLinkSender`.
//!
//! - `resend_sender` - Resend HTTP API
//! - `log_sender` - No-op sender for local development

mod log_sender;
mod resend_sender;

pub use log_sender::LogMagicLinkSender;
pub use resend_sender::{ResendConfig, ResendMagicLinkSender};
