//! Postgres persistence for refresh sessions.
//!
//! Exposes the connection lifecycle ([`Store`]), migrations, and the
//! [`SessionRepo`](repositories::SessionRepo) implementing the core
//! session-store contract.

pub mod models;
pub mod repositories;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

pub type DbPool = PgPool;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("store has not been opened")]
    NotOpen,

    #[error("could not connect to database after {0} attempts")]
    AttemptsExhausted(u32),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Create a connection pool for the given database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Run all pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Check database connectivity.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Owns the pool and its open/close lifecycle.
///
/// `open` retries with a fixed one-second delay because the database is
/// commonly still starting when the service comes up under orchestration.
#[derive(Debug, Default)]
pub struct Store {
    pool: Option<DbPool>,
}

impl Store {
    pub fn new() -> Self {
        Self { pool: None }
    }

    /// Connect, retrying up to `max_attempts` times.
    pub async fn open(&mut self, database_url: &str, max_attempts: u32) -> Result<(), DbError> {
        for attempt in 1..=max_attempts {
            match create_pool(database_url).await {
                Ok(pool) => {
                    tracing::debug!(attempt, "database connection established");
                    self.pool = Some(pool);
                    return Ok(());
                }
                Err(e) => {
                    tracing::debug!(attempt, max_attempts, error = %e, "database connection failed");
                    if attempt < max_attempts {
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        }
        Err(DbError::AttemptsExhausted(max_attempts))
    }

    pub fn pool(&self) -> Result<&DbPool, DbError> {
        self.pool.as_ref().ok_or(DbError::NotOpen)
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    pub async fn close(&mut self) -> Result<(), DbError> {
        match self.pool.take() {
            Some(pool) => {
                pool.close().await;
                Ok(())
            }
            None => Err(DbError::NotOpen),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pool_before_open_fails() {
        let store = Store::new();
        assert!(matches!(store.pool(), Err(DbError::NotOpen)));
    }

    #[tokio::test]
    async fn close_before_open_fails() {
        let mut store = Store::new();
        assert!(matches!(store.close().await, Err(DbError::NotOpen)));
    }
}
