//! API Error Types
//!
//! Defines error types for the API layer and implements conversion
//! to HTTP responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::campaigns::{CreationError, TierError};
use crate::chain::ChainError;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request validation failed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The tier at an index is no longer the one the caller saw
    #[error("Tier {index} changed: {reason}")]
    TierConflict { index: usize, reason: String },

    /// The contract rejected the call
    #[error("{0}")]
    Reverted(String),

    /// Provider or decoding failure
    #[error("Chain error: {0}")]
    Chain(ChainError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ChainError> for ApiError {
    fn from(error: ChainError) -> Self {
        match error {
            ChainError::Reverted { .. } => ApiError::Reverted(error.to_string()),
            other => ApiError::Chain(other),
        }
    }
}

impl From<TierError> for ApiError {
    fn from(error: TierError) -> Self {
        match error {
            TierError::EmptyName | TierError::ZeroAmount => ApiError::Validation(error.to_string()),
            TierError::Conflict { index, reason } => ApiError::TierConflict { index, reason },
            TierError::Chain(e) => e.into(),
        }
    }
}

impl From<CreationError> for ApiError {
    fn from(error: CreationError) -> Self {
        ApiError::Validation(error.to_string())
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::TierConflict { .. } => (StatusCode::CONFLICT, "TIER_CONFLICT"),
            ApiError::Reverted(_) => (StatusCode::UNPROCESSABLE_ENTITY, "CONTRACT_REVERTED"),
            ApiError::Chain(_) => (StatusCode::BAD_GATEWAY, "CHAIN_ERROR"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let request_id = uuid::Uuid::new_v4().to_string();

        // Client-side mistakes and races are expected traffic
        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                ApiError::TierConflict {
                    index: 0,
                    reason: "x".into(),
                },
                StatusCode::CONFLICT,
            ),
            (ApiError::from(ChainError::Unavailable), StatusCode::BAD_GATEWAY),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_revert_keeps_reason() {
        let error = ApiError::from(ChainError::Reverted {
            reason: Some("Only owner".to_string()),
        });
        assert_eq!(error.to_string(), "Execution reverted: Only owner");
        assert_eq!(
            error.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_tier_errors() {
        assert!(matches!(
            ApiError::from(TierError::ZeroAmount),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from(TierError::Chain(ChainError::Timeout)),
            ApiError::Chain(ChainError::Timeout)
        ));
    }
}
