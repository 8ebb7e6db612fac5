//! Webhook error types for billing webhook handling.
//!
//! Every condition that can end webhook processing, with HTTP status mapping
//! and retryability semantics.

use axum::http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors that occur during webhook processing.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// One of `webhook-id`, `webhook-timestamp`, `webhook-signature` is absent or empty.
    #[error("Missing webhook headers")]
    MissingHeaders,

    /// No signature entry matched the expected HMAC.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Timestamp outside the configured replay window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Body was verified but is not the expected JSON envelope.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A recognised event lacks a required field.
    #[error("Malformed event: missing {0}")]
    MalformedEvent(&'static str),

    /// The event names a user that does not exist.
    #[error("User not found")]
    UserNotFound,

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Returns true if the provider should retry delivering this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Database(_))
    }

    /// True for every failure that occurs before the body is trusted.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::MissingHeaders
                | WebhookError::InvalidSignature
                | WebhookError::TimestampOutOfRange
        )
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            WebhookError::MissingHeaders => ErrorCode::MissingHeaders,
            WebhookError::InvalidSignature | WebhookError::TimestampOutOfRange => {
                ErrorCode::InvalidSignature
            }
            WebhookError::MalformedPayload(_) => ErrorCode::ValidationFailed,
            WebhookError::MalformedEvent(_) => ErrorCode::MalformedEvent,
            WebhookError::UserNotFound => ErrorCode::UserNotFound,
            WebhookError::Database(_) => ErrorCode::DatabaseError,
        }
    }

    /// Maps the error to an HTTP status code.
    ///
    /// - 4xx: provider should not retry
    /// - 5xx: provider will retry
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingHeaders
            | WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange => StatusCode::UNAUTHORIZED,

            WebhookError::MalformedPayload(_) | WebhookError::MalformedEvent(_) => {
                StatusCode::BAD_REQUEST
            }

            WebhookError::UserNotFound => StatusCode::NOT_FOUND,

            WebhookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::UserNotFound => WebhookError::UserNotFound,
            _ => WebhookError::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ══════════════════════════════════════════════════════════════
    // Status Code Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verification_failures_are_unauthorized() {
        assert_eq!(
            WebhookError::MissingHeaders.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::InvalidSignature.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebhookError::TimestampOutOfRange.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn malformed_input_is_bad_request() {
        assert_eq!(
            WebhookError::MalformedPayload("eof".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebhookError::MalformedEvent("data.metadata.userId").status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unknown_user_is_not_found() {
        assert_eq!(WebhookError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_error_is_server_error() {
        assert_eq!(
            WebhookError::Database("down".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    // ══════════════════════════════════════════════════════════════
    // Classification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn only_database_error_is_retryable() {
        assert!(WebhookError::Database("down".to_string()).is_retryable());
        assert!(!WebhookError::InvalidSignature.is_retryable());
        assert!(!WebhookError::MalformedEvent("data.id").is_retryable());
    }

    #[test]
    fn verification_failures_are_classified() {
        assert!(WebhookError::MissingHeaders.is_verification_failure());
        assert!(WebhookError::InvalidSignature.is_verification_failure());
        assert!(!WebhookError::MalformedPayload("x".to_string()).is_verification_failure());
    }

    #[test]
    fn domain_user_not_found_maps_to_user_not_found() {
        let err: WebhookError = DomainError::new(ErrorCode::UserNotFound, "gone").into();
        assert!(matches!(err, WebhookError::UserNotFound));
        let err: WebhookError = DomainError::database("down").into();
        assert!(err.is_retryable());
    }

    #[test]
    fn malformed_event_displays_field() {
        let err = WebhookError::MalformedEvent("data.metadata.userId");
        assert_eq!(err.to_string(), "Malformed event: missing data.metadata.userId");
    }
}
