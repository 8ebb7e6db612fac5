//! Identity-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | ValidationFailed | 400 |
//! | InvalidToken | 401 |
//! | TokenAlreadyUsed | 401 |
//! | TokenExpired | 401 |
//! | InvalidCredentials | 401 |
//! | DeliveryFailed | 500 |
//! | ProvisioningFailed | 500 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors raised while issuing, redeeming, or verifying credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// Input failed value-object validation.
    ValidationFailed { field: String, message: String },

    /// No token with that value exists.
    InvalidToken,

    /// The token was already consumed.
    TokenAlreadyUsed,

    /// The token is past its expiry.
    TokenExpired,

    /// Password or other credential did not verify.
    InvalidCredentials,

    /// The magic link could not be delivered.
    DeliveryFailed(String),

    /// A unique username could not be allocated.
    ProvisioningFailed(String),

    /// Infrastructure error.
    Infrastructure(String),
}

impl IdentityError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        IdentityError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn delivery_failed(reason: impl Into<String>) -> Self {
        IdentityError::DeliveryFailed(reason.into())
    }

    pub fn provisioning_failed(reason: impl Into<String>) -> Self {
        IdentityError::ProvisioningFailed(reason.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        IdentityError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            IdentityError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            IdentityError::InvalidToken => ErrorCode::InvalidToken,
            IdentityError::TokenAlreadyUsed => ErrorCode::TokenAlreadyUsed,
            IdentityError::TokenExpired => ErrorCode::TokenExpired,
            IdentityError::InvalidCredentials => ErrorCode::InvalidCredentials,
            IdentityError::DeliveryFailed(_) => ErrorCode::DeliveryFailed,
            IdentityError::ProvisioningFailed(_) => ErrorCode::InternalError,
            IdentityError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            IdentityError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            IdentityError::InvalidToken => "Invalid sign-in link".to_string(),
            IdentityError::TokenAlreadyUsed => "This sign-in link has already been used".to_string(),
            IdentityError::TokenExpired => "This sign-in link has expired".to_string(),
            IdentityError::InvalidCredentials => "Invalid email or password".to_string(),
            IdentityError::DeliveryFailed(_) => "Failed to send sign-in email".to_string(),
            IdentityError::ProvisioningFailed(_) => "Failed to create account".to_string(),
            IdentityError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// True for every rejection of a presented credential.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            IdentityError::InvalidToken
                | IdentityError::TokenAlreadyUsed
                | IdentityError::TokenExpired
                | IdentityError::InvalidCredentials
        )
    }
}

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for IdentityError {}

impl From<ValidationError> for IdentityError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::EmptyField { field } => {
                IdentityError::validation(field, "cannot be empty")
            }
            ValidationError::TooLong { field, max } => {
                IdentityError::validation(field, format!("exceeds {} characters", max))
            }
            ValidationError::InvalidFormat { field, reason } => {
                IdentityError::validation(field, reason)
            }
        }
    }
}

impl From<DomainError> for IdentityError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => IdentityError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => IdentityError::Infrastructure(err.to_string()),
        }
    }
}

impl From<IdentityError> for DomainError {
    fn from(err: IdentityError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
