//! API error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use keygate_core::error::{AuthError, StoreError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Auth(AuthError::from(e))
    }
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            AppError::Auth(AuthError::InvalidInput(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT")
            }
            AppError::Auth(AuthError::Unauthenticated(_)) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED")
            }
            AppError::Auth(AuthError::SecurityViolation(_)) => {
                (StatusCode::UNAUTHORIZED, "SECURITY_VIOLATION")
            }
            AppError::Auth(AuthError::Unavailable(_) | AuthError::Internal(_))
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Internal details stay in the logs, never on the wire.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "An internal error occurred".to_string()
        } else {
            if matches!(self, AppError::Auth(AuthError::SecurityViolation(_))) {
                tracing::warn!(error = %self, "security violation");
            }
            self.to_string()
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}
