//! Liveness and database health.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let db_healthy = match keygate_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "database health check failed");
            false
        }
    };

    let status = if db_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let body = json!({
        "status": if db_healthy { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "db_healthy": db_healthy,
    });

    (status, Json(body))
}
