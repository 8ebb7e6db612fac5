//! Entitlement domain - paid/free state, billing events, and webhook trust.
//!
//! # Module Structure
//!
//! - `status` - Free/Paid state machine and change outcomes
//! - `webhook_verifier` - HMAC-SHA256 signature verification
//! - `billing_event` - Parsing of verified event bodies
//! - `webhook_errors` - Webhook failure taxonomy with HTTP mapping
//! - `errors` - Errors for cancellation, checkout, and paid-only operations

mod billing_event;
mod errors;
mod status;
mod webhook_errors;
mod webhook_verifier;

pub use billing_event::{BillingEvent, SUBSCRIPTION_ACTIVE, SUBSCRIPTION_CANCELED};
pub use errors::EntitlementError;
pub use status::{EntitlementChange, EntitlementStatus};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{WebhookHeaders, WebhookVerifier};
