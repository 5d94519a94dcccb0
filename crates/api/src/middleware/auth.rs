//! Bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use keygate_core::token::DecodeError;
use keygate_core::types::UserId;

use crate::error::AppError;
use crate::state::AppState;

/// Extracts and verifies the Bearer access token, yielding the caller's id.
///
/// Full validation here, expiry included; the expiry-waived decode path is
/// reserved for the refresh flow.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: UserId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Auth(keygate_core::error::AuthError::Unauthenticated(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Auth(keygate_core::error::AuthError::Unauthenticated(
                "Invalid Authorization header format".into(),
            ))
        })?;

        let claims = state.codec.decode(token).map_err(|e| {
            let message = match e {
                DecodeError::Expired => "Token has expired",
                DecodeError::Malformed | DecodeError::SignatureInvalid => "Invalid token",
            };
            AppError::Auth(keygate_core::error::AuthError::Unauthenticated(
                message.into(),
            ))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
