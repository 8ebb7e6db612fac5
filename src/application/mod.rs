//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers own no state beyond their injected ports.

pub mod handlers;

pub use handlers::entitlement::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CheckoutSettings,
    CreateCheckoutCommand, CreateCheckoutHandler, HandleBillingWebhookCommand,
    HandleBillingWebhookHandler, HandleBillingWebhookResult,
};
pub use handlers::identity::{
    MagicLinkSettings, PasswordCredentialVerifier, RedeemMagicLinkCommand,
    RedeemMagicLinkHandler, RequestMagicLinkCommand, RequestMagicLinkHandler,
    SetPasswordCommand, SetPasswordHandler, SignInCommand, SignInHandler,
};
pub use handlers::publishing::{
    ApplyAccessPolicyCommand, ApplyAccessPolicyHandler, RepublishArticlesCommand,
    RepublishArticlesHandler,
};
