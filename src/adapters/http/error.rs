//! Error-to-response mapping shared by every HTTP module.
//!
//! All failures render as `{ "code": ..., "message": ... }`. Server-side
//! failures are logged in full and rendered with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::entitlement::{EntitlementError, WebhookError};
use crate::domain::foundation::ErrorCode;
use crate::domain::identity::IdentityError;

/// Standard error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// API error type that converts module errors to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    Identity(IdentityError),
    Entitlement(EntitlementError),
    Webhook(WebhookError),
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        ApiError::Identity(err)
    }
}

impl From<EntitlementError> for ApiError {
    fn from(err: EntitlementError) -> Self {
        ApiError::Entitlement(err)
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        ApiError::Webhook(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Identity(err) => match err {
                IdentityError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
                IdentityError::InvalidToken
                | IdentityError::TokenAlreadyUsed
                | IdentityError::TokenExpired
                | IdentityError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                IdentityError::DeliveryFailed(_)
                | IdentityError::ProvisioningFailed(_)
                | IdentityError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Entitlement(err) => match err {
                EntitlementError::UserNotFound(_) => StatusCode::NOT_FOUND,
                EntitlementError::NoActiveSubscription => StatusCode::CONFLICT,
                EntitlementError::PaidPlanRequired => StatusCode::FORBIDDEN,
                EntitlementError::RevocationFailed { .. }
                | EntitlementError::CheckoutCreationFailed { .. }
                | EntitlementError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Webhook(err) => err.status_code(),
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            ApiError::Identity(err) => err.code(),
            ApiError::Entitlement(err) => err.code(),
            ApiError::Webhook(err) => err.code(),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Identity(err) => err.message(),
            ApiError::Entitlement(err) => err.message(),
            ApiError::Webhook(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = if status.is_server_error() {
            tracing::error!(%code, error = ?self, "Request failed");
            match self {
                ApiError::Identity(IdentityError::DeliveryFailed(_)) => self.message(),
                ApiError::Entitlement(EntitlementError::RevocationFailed { .. })
                | ApiError::Entitlement(EntitlementError::CheckoutCreationFailed { .. }) => {
                    self.message()
                }
                _ => "Internal server error".to_string(),
            }
        } else {
            self.message()
        };

        (status, Json(ErrorResponse::new(code.to_string(), message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    #[test]
    fn token_failures_are_unauthorized() {
        for err in [
            IdentityError::InvalidToken,
            IdentityError::TokenAlreadyUsed,
            IdentityError::TokenExpired,
            IdentityError::InvalidCredentials,
        ] {
            assert_eq!(ApiError::from(err).status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn entitlement_errors_map_to_taxonomy() {
        assert_eq!(
            ApiError::from(EntitlementError::NoActiveSubscription).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(EntitlementError::PaidPlanRequired).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(EntitlementError::UserNotFound(UserId::new())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(EntitlementError::revocation_failed("502")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn webhook_errors_use_their_own_status() {
        assert_eq!(
            ApiError::from(WebhookError::InvalidSignature).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(WebhookError::MalformedPayload("eof".to_string())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn infrastructure_details_are_not_exposed() {
        let err = ApiError::from(IdentityError::infrastructure("connection refused to 10.0.0.5"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
