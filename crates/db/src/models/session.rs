//! Row mapping for the `refresh_sessions` table.

use chrono::{DateTime, Utc};
use keygate_core::session::Session;
use uuid::Uuid;

/// A `refresh_sessions` row. Carries `created_at` for the audit trail even
/// though the rotation rules never read it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionRow {
    pub id: i64,
    pub user_id: Uuid,
    pub secret_hash: String,
    pub device_fingerprint: String,
    pub origin_address: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: row.id,
            user_id: row.user_id,
            secret_hash: row.secret_hash,
            device_fingerprint: row.device_fingerprint,
            origin_address: row.origin_address,
            expires_at: row.expires_at,
            revoked: row.revoked,
        }
    }
}
