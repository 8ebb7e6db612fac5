//! Entitlement-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | UserNotFound | 404 |
//! | NoActiveSubscription | 409 |
//! | PaidPlanRequired | 403 |
//! | RevocationFailed | 500 |
//! | CheckoutCreationFailed | 500 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, UserId};

/// Errors raised by subscription and access operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    /// The user does not exist.
    UserNotFound(UserId),

    /// Cancellation requested by a user who is not paid.
    NoActiveSubscription,

    /// Operation reserved for paid users.
    PaidPlanRequired,

    /// The provider did not confirm the subscription was revoked.
    RevocationFailed { reason: String },

    /// The provider did not return a checkout session.
    CheckoutCreationFailed { reason: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl EntitlementError {
    pub fn user_not_found(user_id: UserId) -> Self {
        EntitlementError::UserNotFound(user_id)
    }

    pub fn revocation_failed(reason: impl Into<String>) -> Self {
        EntitlementError::RevocationFailed {
            reason: reason.into(),
        }
    }

    pub fn checkout_creation_failed(reason: impl Into<String>) -> Self {
        EntitlementError::CheckoutCreationFailed {
            reason: reason.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        EntitlementError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EntitlementError::UserNotFound(_) => ErrorCode::UserNotFound,
            EntitlementError::NoActiveSubscription => ErrorCode::NoActiveSubscription,
            EntitlementError::PaidPlanRequired => ErrorCode::Forbidden,
            EntitlementError::RevocationFailed { .. } => ErrorCode::RevocationFailed,
            EntitlementError::CheckoutCreationFailed { .. } => ErrorCode::CheckoutCreationFailed,
            EntitlementError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            EntitlementError::UserNotFound(id) => format!("User not found: {}", id),
            EntitlementError::NoActiveSubscription => {
                "No active subscription to cancel".to_string()
            }
            EntitlementError::PaidPlanRequired => {
                "This action requires an active subscription".to_string()
            }
            EntitlementError::RevocationFailed { .. } => {
                "Subscription could not be cancelled with the payment provider".to_string()
            }
            EntitlementError::CheckoutCreationFailed { .. } => {
                "Checkout session could not be created".to_string()
            }
            EntitlementError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for EntitlementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EntitlementError {}

impl From<DomainError> for EntitlementError {
    fn from(err: DomainError) -> Self {
        EntitlementError::Infrastructure(err.to_string())
    }
}

impl From<EntitlementError> for DomainError {
    fn from(err: EntitlementError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_one_to_one() {
        assert_eq!(
            EntitlementError::NoActiveSubscription.code(),
            ErrorCode::NoActiveSubscription
        );
        assert_eq!(
            EntitlementError::revocation_failed("timeout").code(),
            ErrorCode::RevocationFailed
        );
        assert_eq!(
            EntitlementError::checkout_creation_failed("502").code(),
            ErrorCode::CheckoutCreationFailed
        );
        assert_eq!(EntitlementError::PaidPlanRequired.code(), ErrorCode::Forbidden);
    }

    #[test]
    fn upstream_reason_is_not_exposed_in_message() {
        let err = EntitlementError::revocation_failed("sk_live_abc rejected");
        assert!(!err.message().contains("sk_live"));
    }

    #[test]
    fn domain_error_becomes_infrastructure() {
        let err: EntitlementError = DomainError::database("down").into();
        assert!(matches!(err, EntitlementError::Infrastructure(_)));
    }
}
