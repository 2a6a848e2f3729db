//! API error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use appsearch_core::error::{Error as CoreError, ErrorKind};

pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned to HTTP clients as `{ "error": ..., "code": ... }`.
#[derive(Debug, Clone, Serialize, Error)]
#[error("[{status}] [{code}] {message}")]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    #[serde(rename = "error")]
    pub message: String,
    pub code: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, code: &'static str) -> Self {
        Self { status, message: message.into(), code }
    }

    /// 400 Bad Request
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, ErrorKind::ValidationError.as_str())
    }

    /// 500 with a fixed message; the cause is only logged.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal error", "internal_error")
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err.kind() {
            ErrorKind::ValidationError => {
                warn!(error = %err, "rejected request");
                let message = match err {
                    CoreError::Validation(msg) => msg,
                    other => other.to_string(),
                };
                Self::validation(message)
            }
            ErrorKind::DependencyError => {
                error!(error = %err, "embedding backend failed");
                Self::new(StatusCode::BAD_GATEWAY, "Embedding service failed", ErrorKind::DependencyError.as_str())
            }
            kind => {
                error!(error = %err, kind = kind.as_str(), "request failed");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
