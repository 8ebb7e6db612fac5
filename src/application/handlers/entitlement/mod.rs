//! Entitlement command handlers.
//!
//! ## Commands
//!
//! - `HandleBillingWebhookCommand` - Verify and apply a billing provider event
//! - `CancelSubscriptionCommand` - Revoke at the provider, downgrade, lock articles
//! - `CreateCheckoutCommand` - Start a paid-plan checkout

mod cancel_subscription;
mod create_checkout;
mod handle_billing_webhook;

pub use cancel_subscription::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CancelSubscriptionResult,
};
pub use create_checkout::{
    CheckoutSettings, CreateCheckoutCommand, CreateCheckoutHandler, CreateCheckoutResult,
};
pub use handle_billing_webhook::{
    HandleBillingWebhookCommand, HandleBillingWebhookHandler, HandleBillingWebhookResult,
};
