//! Token lifecycle handlers: issue, refresh, introspect, logout.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use keygate_core::error::AuthError;
use keygate_core::issuer::TokenPair;
use keygate_core::types::UserId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::ClientMeta;
use crate::middleware::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TokensQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_secret,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: UserId,
}

/// GET /tokens?user_id=<uuid>
///
/// Issue a fresh token pair for a user. Upstream authentication (who may
/// ask for whose tokens) is the deployment's concern; this endpoint trusts
/// its caller.
pub async fn issue_tokens(
    State(state): State<AppState>,
    meta: ClientMeta,
    Query(query): Query<TokensQuery>,
) -> Result<Json<TokenPairResponse>, AppError> {
    let raw = query
        .user_id
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest("need user id".into()))?;

    let user_id =
        Uuid::parse_str(&raw).map_err(|_| AppError::BadRequest("invalid user id".into()))?;

    let pair = state
        .issuer
        .create_token_pair(user_id, &meta.device_fingerprint, &meta.origin_address)
        .await?;

    tracing::info!(%user_id, "token pair issued");
    Ok(Json(pair.into()))
}

/// POST /refresh
///
/// Rotate a refresh credential. The access token in the body may be
/// expired; the refresh token must match a stored active session.
pub async fn refresh(
    State(state): State<AppState>,
    meta: ClientMeta,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenPairResponse>, AppError> {
    if body.access_token.is_empty() || body.refresh_token.is_empty() {
        return Err(AppError::BadRequest(
            "access_token and refresh_token are required".into(),
        ));
    }

    let pair = state
        .guard
        .refresh(
            &body.access_token,
            &body.refresh_token,
            &meta.device_fingerprint,
            &meta.origin_address,
        )
        .await?;

    Ok(Json(pair.into()))
}

/// GET /me
///
/// Introspect the presented access token. Requires a currently valid
/// (unexpired) token.
pub async fn me(user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: user.user_id,
    })
}

/// POST /logout
///
/// Revoke every session the caller owns. Idempotent: revoking zero
/// sessions is still success.
pub async fn logout(State(state): State<AppState>, user: AuthUser) -> Result<StatusCode, AppError> {
    let revoked = state
        .sessions
        .revoke_all(user.user_id)
        .await
        .map_err(AuthError::from)?;

    tracing::info!(user_id = %user.user_id, revoked, "logout revoked all sessions");
    Ok(StatusCode::NO_CONTENT)
}
