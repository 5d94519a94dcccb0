pub mod auth;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Every route the service exposes, mounted at the root.
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
}
