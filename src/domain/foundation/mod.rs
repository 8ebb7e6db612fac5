//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types shared by the
//! identity, entitlement, and publishing modules.

mod auth;
mod email;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use email::EmailAddress;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ArticleId, MagicLinkTokenId, UserId};
pub use timestamp::Timestamp;
