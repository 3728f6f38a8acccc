//! API error type and its HTTP mapping.
//!
//! Error bodies are `{"detail": "..."}`, the wire format the original
//! service exposed. Server-side failures are logged with their real cause
//! and surfaced as a generic 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use caseflow_core::EngineError;
use caseflow_db::DbError;

/// Errors surfaced by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid credentials (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but lacking role or ownership (403).
    #[error("Insufficient permissions")]
    Forbidden,

    /// Target entity missing or not visible to the caller (404).
    #[error("{0}")]
    NotFound(String),

    /// Illegal state transition or constraint violation (400).
    #[error("{0}")]
    Conflict(String),

    /// Required seed data absent (500).
    #[error("{0}")]
    Configuration(String),

    /// Unexpected failure (500).
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Configuration(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => ApiError::NotFound("Not found".to_string()),
            DbError::DuplicateKey(_) => ApiError::Conflict("Already exists".to_string()),
            DbError::ForeignKeyViolation(_) => {
                ApiError::Conflict("Referenced entity does not exist".to_string())
            }
            other => {
                tracing::error!(error = %other, "database error");
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound(detail) => ApiError::NotFound(detail),
            EngineError::Conflict(detail) => ApiError::Conflict(detail),
            EngineError::Configuration(detail) => ApiError::Configuration(detail),
            EngineError::Db(db) => db.into(),
        }
    }
}

/// Result type for request handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Unauthorized("x".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Configuration("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_engine_error_mapping() {
        let err: ApiError = EngineError::Conflict("Step is not busy".into()).into();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert_eq!(err.to_string(), "Step is not busy");
    }
}
