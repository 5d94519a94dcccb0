//! Postgres-backed session store.
//!
//! The conditional UPDATE in [`SessionRepo::revoke_one`] is what makes
//! concurrent rotation of the same secret single-winner: only the statement
//! that actually flips `revoked` reports a row affected.

use async_trait::async_trait;
use keygate_core::error::StoreError;
use keygate_core::session::{NewSession, Session, SessionStore};
use keygate_core::types::{SessionId, UserId};

use crate::models::SessionRow;
use crate::DbPool;

const COLUMNS: &str =
    "id, user_id, secret_hash, device_fingerprint, origin_address, expires_at, revoked, created_at";

#[derive(Debug, Clone)]
pub struct SessionRepo {
    pool: DbPool,
}

impl SessionRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Insert a new session row and return its id.
    pub async fn create(&self, session: &NewSession) -> Result<i64, sqlx::Error> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO refresh_sessions
                (user_id, secret_hash, device_fingerprint, origin_address, expires_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(session.user_id)
        .bind(&session.secret_hash)
        .bind(&session.device_fingerprint)
        .bind(&session.origin_address)
        .bind(session.expires_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    /// All unrevoked, unexpired sessions for a user. Expiry is enforced
    /// here at read time; expired rows stay in the table untouched.
    pub async fn find_active(&self, user_id: UserId) -> Result<Vec<SessionRow>, sqlx::Error> {
        sqlx::query_as(&format!(
            r#"
            SELECT {COLUMNS}
            FROM refresh_sessions
            WHERE user_id = $1 AND revoked = FALSE AND expires_at > NOW()
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Revoke a session iff it is still active. Returns whether this call
    /// made the transition.
    pub async fn revoke_one(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_sessions
            SET revoked = TRUE
            WHERE id = $1 AND revoked = FALSE AND expires_at > NOW()
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every non-revoked session for a user, expired ones included,
    /// so the tombstone trail is complete. Returns the count revoked.
    pub async fn revoke_all(&self, user_id: UserId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_sessions
            SET revoked = TRUE
            WHERE user_id = $1 AND revoked = FALSE
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

fn unavailable(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl SessionStore for SessionRepo {
    async fn create(&self, session: NewSession) -> Result<SessionId, StoreError> {
        SessionRepo::create(self, &session).await.map_err(unavailable)
    }

    async fn find_active(&self, user_id: UserId) -> Result<Vec<Session>, StoreError> {
        let rows = SessionRepo::find_active(self, user_id)
            .await
            .map_err(unavailable)?;
        Ok(rows.into_iter().map(Session::from).collect())
    }

    async fn revoke_one(&self, id: SessionId) -> Result<bool, StoreError> {
        SessionRepo::revoke_one(self, id).await.map_err(unavailable)
    }

    async fn revoke_all(&self, user_id: UserId) -> Result<u64, StoreError> {
        SessionRepo::revoke_all(self, user_id).await.map_err(unavailable)
    }
}
