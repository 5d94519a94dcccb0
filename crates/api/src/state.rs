//! Shared application state.

use std::sync::Arc;

use keygate_core::issuer::TokenIssuer;
use keygate_core::notify::NotificationSink;
use keygate_core::rotation::RotationGuard;
use keygate_core::secret::SecretHasher;
use keygate_core::session::SessionStore;
use keygate_core::token::AccessTokenCodec;
use keygate_db::repositories::SessionRepo;
use keygate_db::DbPool;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
    pub codec: AccessTokenCodec,
    pub issuer: TokenIssuer,
    pub guard: Arc<RotationGuard>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    /// Wire the token engine onto the given pool and notification sink.
    pub fn build(pool: DbPool, config: ServerConfig, sink: Arc<dyn NotificationSink>) -> Self {
        let codec = AccessTokenCodec::new(
            config.auth.jwt_secret.as_bytes(),
            config.auth.access_token_ttl_mins,
        );
        let hasher = SecretHasher::new(config.auth.refresh_hash_key.as_bytes());

        let sessions: Arc<dyn SessionStore> = Arc::new(SessionRepo::new(pool.clone()));
        let issuer = TokenIssuer::new(
            codec.clone(),
            hasher.clone(),
            Arc::clone(&sessions),
            config.auth.refresh_session_ttl_hours,
        );
        let guard = Arc::new(RotationGuard::new(
            codec.clone(),
            hasher,
            Arc::clone(&sessions),
            issuer.clone(),
            sink,
        ));

        Self {
            pool,
            config: Arc::new(config),
            codec,
            issuer,
            guard,
            sessions,
        }
    }
}
