//! Environment-driven configuration.
//!
//! | Variable                  | Default                         | Meaning                                   |
//! |---------------------------|---------------------------------|-------------------------------------------|
//! | `HOST`                    | `0.0.0.0`                       | Bind address                              |
//! | `PORT`                    | `8080`                          | Bind port                                 |
//! | `CORS_ORIGINS`            | (none)                          | Comma-separated allowed origins           |
//! | `REQUEST_TIMEOUT_SECS`    | `30`                            | Per-request timeout                       |
//! | `DB_MAX_CONNECT_ATTEMPTS` | `5`                             | Database connection retries at startup    |
//! | `JWT_SECRET`              | (required)                      | Access-token signing key                  |
//! | `REFRESH_HASH_KEY`        | (required)                      | Keyed-hash key for refresh secrets        |
//! | `ACCESS_TOKEN_TTL_MINS`   | `15`                            | Access-token lifetime                     |
//! | `REFRESH_SESSION_TTL_HOURS` | `24`                          | Refresh-session lifetime                  |
//! | `WEBHOOK_URL`             | `http://localhost:8081/webhook` | Origin-change notification endpoint       |
//! | `NOTIFY_QUEUE_CAPACITY`   | `64`                            | Bounded notification queue size           |
//!
//! `DATABASE_URL` is read directly in `main` (sqlx tooling owns that name).

use std::env;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub db_max_connect_attempts: u32,
    pub auth: AuthConfig,
    pub webhook: WebhookConfig,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub refresh_hash_key: String,
    pub access_token_ttl_mins: i64,
    pub refresh_session_ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub queue_capacity: usize,
}

impl ServerConfig {
    /// Read configuration from the environment.
    ///
    /// Panics on missing required variables or unparseable values; there is
    /// no sensible way to continue, and failing at startup beats failing on
    /// the first request.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parsed("PORT", 8080),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            request_timeout_secs: parsed("REQUEST_TIMEOUT_SECS", 30),
            db_max_connect_attempts: parsed("DB_MAX_CONNECT_ATTEMPTS", 5),
            auth: AuthConfig {
                jwt_secret: required("JWT_SECRET"),
                refresh_hash_key: required("REFRESH_HASH_KEY"),
                access_token_ttl_mins: parsed("ACCESS_TOKEN_TTL_MINS", 15),
                refresh_session_ttl_hours: parsed("REFRESH_SESSION_TTL_HOURS", 24),
            },
            webhook: WebhookConfig {
                url: env::var("WEBHOOK_URL")
                    .unwrap_or_else(|_| "http://localhost:8081/webhook".to_string()),
                queue_capacity: parsed("NOTIFY_QUEUE_CAPACITY", 64),
            },
        }
    }
}

fn required(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("{name} must be set"))
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(v) => v
            .parse()
            .unwrap_or_else(|_| panic!("{name} is not a valid value")),
        Err(_) => default,
    }
}
