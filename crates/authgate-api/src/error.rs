//! Maps `AppError` to RPC status codes and HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use authgate_core::error::{AppError, ErrorKind};

/// Message returned for every internal fault; the cause is only logged.
const INTERNAL_MESSAGE: &str = "Internal error";

/// Error body returned to RPC callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable status code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// Handler error wrapping an [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// RPC status for this error.
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self.0.kind {
            ErrorKind::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            ErrorKind::AlreadyExists => (StatusCode::CONFLICT, "ALREADY_EXISTS"),
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            let cause = std::error::Error::source(&self.0)
                .map(ToString::to_string)
                .unwrap_or_default();
            tracing::error!(kind = %self.0.kind, error = %self.0.message, cause = %cause, "Internal error");
            INTERNAL_MESSAGE.to_string()
        } else {
            self.0.message
        };

        let body = ApiErrorResponse {
            code: code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}
