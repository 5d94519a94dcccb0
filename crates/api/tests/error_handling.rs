//! Tests for `AppError` → HTTP response mapping.
//!
//! These tests verify that each `AppError` variant produces the correct HTTP
//! status code, error code, and message. They do NOT need an HTTP server --
//! they call `IntoResponse` directly on `AppError` values.

use axum::response::IntoResponse;
use http_body_util::BodyExt;
use keygate_api::error::AppError;
use keygate_core::error::{AuthError, StoreError};

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (axum::http::StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn bad_request_returns_400() {
    let err = AppError::BadRequest("need user id".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_INPUT");
    assert_eq!(json["error"], "need user id");
}

#[tokio::test]
async fn unauthenticated_returns_401() {
    let err = AppError::Auth(AuthError::Unauthenticated("Invalid token".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Unauthorized: Invalid token");
}

#[tokio::test]
async fn security_violation_returns_401_with_distinct_code() {
    let err = AppError::Auth(AuthError::SecurityViolation(
        "Device mismatch. All sessions have been revoked.".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "SECURITY_VIOLATION");
    assert_eq!(
        json["error"],
        "Security violation: Device mismatch. All sessions have been revoked."
    );
}

#[tokio::test]
async fn storage_failure_returns_500_and_sanitizes_message() {
    let err = AppError::from(StoreError::Unavailable(
        "connection refused at db.internal:5432".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");

    // The response body must NOT contain the original error details.
    let body_text = json.to_string();
    assert!(
        !body_text.contains("db.internal"),
        "Internal error response must not leak infrastructure details"
    );
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::Internal("session creation failed: unique violation".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn invalid_input_returns_400() {
    let err = AppError::Auth(AuthError::InvalidInput("user id is required".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, axum::http::StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_INPUT");
    assert_eq!(json["error"], "Invalid input: user id is required");
}
