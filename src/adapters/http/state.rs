//! Shared application state for all HTTP modules.

use std::sync::Arc;
use std::time::Duration;

use crate::application::handlers::entitlement::{
    CancelSubscriptionHandler, CheckoutSettings, CreateCheckoutHandler,
    HandleBillingWebhookHandler,
};
use crate::application::handlers::identity::{
    MagicLinkSettings, PasswordCredentialVerifier, RedeemMagicLinkHandler,
    RequestMagicLinkHandler, SetPasswordHandler, SignInHandler,
};
use crate::application::handlers::publishing::{
    ApplyAccessPolicyHandler, RepublishArticlesHandler,
};
use crate::domain::entitlement::WebhookVerifier;
use crate::ports::{
    ArticleRepository, Clock, CredentialVerifier, MagicLinkRepository, MagicLinkSender,
    PasswordHasher, PaymentProvider, SessionIssuer, SessionValidator, UserRepository,
};

/// Dependencies shared by every request.
///
/// Cloned per request; everything inside is behind an `Arc`. Handlers are
/// built on demand from these ports.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub magic_links: Arc<dyn MagicLinkRepository>,
    pub articles: Arc<dyn ArticleRepository>,
    pub magic_link_sender: Arc<dyn MagicLinkSender>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub session_issuer: Arc<dyn SessionIssuer>,
    pub session_validator: Arc<dyn SessionValidator>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
    pub webhook_verifier: Arc<WebhookVerifier>,
    pub magic_link: MagicLinkSettings,
    pub checkout: CheckoutSettings,
    pub revoke_timeout: Duration,
    pub lock_on_provider_cancellation: bool,
}

impl AppState {
    pub fn request_magic_link_handler(&self) -> RequestMagicLinkHandler {
        RequestMagicLinkHandler::new(
            self.magic_links.clone(),
            self.magic_link_sender.clone(),
            self.clock.clone(),
            self.magic_link.clone(),
        )
    }

    /// Sign-in accepts magic-link tokens and passwords.
    pub fn sign_in_handler(&self) -> SignInHandler {
        let verifiers: Vec<Arc<dyn CredentialVerifier>> = vec![
            Arc::new(RedeemMagicLinkHandler::new(
                self.magic_links.clone(),
                self.users.clone(),
                self.clock.clone(),
            )),
            Arc::new(PasswordCredentialVerifier::new(
                self.users.clone(),
                self.password_hasher.clone(),
            )),
        ];
        SignInHandler::new(verifiers, self.session_issuer.clone())
    }

    pub fn set_password_handler(&self) -> SetPasswordHandler {
        SetPasswordHandler::new(
            self.users.clone(),
            self.password_hasher.clone(),
            self.clock.clone(),
        )
    }

    pub fn webhook_handler(&self) -> HandleBillingWebhookHandler {
        HandleBillingWebhookHandler::new(
            self.webhook_verifier.clone(),
            self.users.clone(),
            self.access_policy_handler(),
            self.clock.clone(),
        )
        .with_lock_on_provider_cancellation(self.lock_on_provider_cancellation)
    }

    pub fn checkout_handler(&self) -> CreateCheckoutHandler {
        CreateCheckoutHandler::new(
            self.users.clone(),
            self.payment_provider.clone(),
            self.checkout.clone(),
        )
    }

    pub fn cancel_subscription_handler(&self) -> CancelSubscriptionHandler {
        CancelSubscriptionHandler::new(
            self.users.clone(),
            self.payment_provider.clone(),
            self.access_policy_handler(),
            self.clock.clone(),
        )
        .with_revoke_timeout(self.revoke_timeout)
    }

    pub fn republish_handler(&self) -> RepublishArticlesHandler {
        RepublishArticlesHandler::new(self.users.clone(), self.articles.clone())
    }

    fn access_policy_handler(&self) -> Arc<ApplyAccessPolicyHandler> {
        Arc::new(ApplyAccessPolicyHandler::new(self.articles.clone()))
    }
}
