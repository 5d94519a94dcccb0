use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tokens", get(auth::issue_tokens))
        .route("/refresh", post(auth::refresh))
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
}
