//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence
//!
//! - `UserRepository` - User accounts and entitlement fields
//! - `MagicLinkRepository` - Issued tokens with atomic single use
//! - `ArticleRepository` - Article visibility
//!
//! ## Outbound
//!
//! - `MagicLinkSender` - Email delivery of sign-in links
//! - `PaymentProvider` - Checkout sessions and subscription revocation
//!
//! ## Authentication
//!
//! - `CredentialVerifier` - One capability per credential kind
//! - `PasswordHasher` - Password hash verification
//! - `SessionIssuer` / `SessionValidator` - Session tokens
//!
//! ## Time
//!
//! - `Clock` - Injected time source

mod article_repository;
mod clock;
mod credential_verifier;
mod magic_link_repository;
mod magic_link_sender;
mod password_hasher;
mod payment_provider;
mod session_validator;
mod user_repository;

pub use article_repository::ArticleRepository;
pub use clock::{Clock, ManualClock, SystemClock};
pub use credential_verifier::CredentialVerifier;
pub use magic_link_repository::MagicLinkRepository;
pub use magic_link_sender::{DeliveryError, MagicLinkSender};
pub use password_hasher::PasswordHasher;
pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
};
pub use session_validator::{SessionIssuer, SessionToken, SessionValidator};
pub use user_repository::UserRepository;
