//! API error types and responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use subvault_core::QuotaStatus;

use crate::quota::quota_exceeded_message;

/// Returned for request bodies that are not the expected JSON shape.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// Error code returned in the body of a quota rejection.
pub const QUOTA_EXCEEDED_CODE: &str = "QUOTA_EXCEEDED";

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Unauthorized - missing or invalid session.
    #[error("unauthorized")]
    Unauthorized,

    /// Free-tier allowance used up and no personal credential stored.
    #[error("quota exceeded: {message}")]
    QuotaExceeded {
        /// Quota at the time of the check.
        quota: QuotaStatus,
        /// Human-readable explanation.
        message: String,
    },

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The transcript provider rejected the request.
    #[error("upstream error ({status}): {message}")]
    Upstream {
        /// Status code returned by the provider.
        status: StatusCode,
        /// Message shown to the caller.
        message: String,
    },

    /// The service is missing configuration it needs for this request.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Quota rejection carrying the caller's current status.
    #[must_use]
    pub fn quota_exceeded(quota: QuotaStatus) -> Self {
        Self::QuotaExceeded {
            message: quota_exceeded_message(quota.limit.unwrap_or_default()),
            quota,
        }
    }
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quota: Option<QuotaStatus>,
}

impl ErrorResponse {
    fn plain(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            quota: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse::plain(msg)),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorResponse::plain("Not logged in"),
            ),
            Self::QuotaExceeded { quota, message } => (
                StatusCode::FORBIDDEN,
                ErrorResponse {
                    error: QUOTA_EXCEEDED_CODE.to_string(),
                    message: Some(message),
                    quota: Some(quota),
                },
            ),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::plain(msg)),
            Self::Upstream { status, message } => (status, ErrorResponse::plain(message)),
            Self::Configuration(msg) => {
                tracing::error!(error = %msg, "Service misconfigured");
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::plain(msg))
            }
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::plain("An unexpected error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(
            status = %rejection.status(),
            error = %rejection.body_text(),
            "Rejected request body"
        );
        Self::BadRequest(INVALID_BODY_MESSAGE.to_string())
    }
}

impl From<subvault_store::StoreError> for ApiError {
    fn from(err: subvault_store::StoreError) -> Self {
        match err {
            subvault_store::StoreError::NotFound { entity, id } => {
                Self::NotFound(format!("{entity} not found: {id}"))
            }
            subvault_store::StoreError::Database(msg)
            | subvault_store::StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}
