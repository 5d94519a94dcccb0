//! The persistent session record and the store contract it lives behind.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{SessionId, Timestamp, UserId};

/// A refresh session: the stored binding of a hashed refresh secret to a
/// user, device, origin, and expiry.
///
/// Sessions are never deleted; revocation is a tombstone so the audit trail
/// survives. `secret_hash` is write-once -- rotation creates a new session
/// instead of mutating the hash, and `revoked` only ever transitions from
/// `false` to `true`.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub secret_hash: String,
    pub device_fingerprint: String,
    pub origin_address: String,
    pub expires_at: Timestamp,
    pub revoked: bool,
}

impl Session {
    /// A session is active iff it is not revoked and not yet expired.
    ///
    /// Expiry is evaluated lazily at read time; there is no sweeper, and
    /// [`SessionStore::find_active`] is the sole enforcement point.
    pub fn is_active(&self, now: Timestamp) -> bool {
        !self.revoked && now < self.expires_at
    }
}

/// Input for creating a session. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: UserId,
    pub secret_hash: String,
    pub device_fingerprint: String,
    pub origin_address: String,
    pub expires_at: Timestamp,
}

/// Contract the session store must satisfy for the rotation rules to be
/// safe under concurrent use.
///
/// Every operation must be individually atomic; the conditional
/// [`revoke_one`](SessionStore::revoke_one) is what prevents two concurrent
/// rotations of the same secret from both succeeding.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session and return its id. One user may legitimately
    /// hold many concurrent active sessions (one per device); duplicates
    /// are never coalesced.
    async fn create(&self, session: NewSession) -> Result<SessionId, StoreError>;

    /// All sessions for `user_id` satisfying the active predicate.
    /// Ordering is unspecified.
    async fn find_active(&self, user_id: UserId) -> Result<Vec<Session>, StoreError>;

    /// Revoke a single session iff it is currently active. Returns whether
    /// this call performed the transition -- `false` means the session was
    /// already revoked or expired (e.g. a concurrent rotation won the
    /// race). Never errors on "already revoked".
    async fn revoke_one(&self, id: SessionId) -> Result<bool, StoreError>;

    /// Revoke every non-revoked session owned by `user_id` in one atomic
    /// step. Returns the number of sessions revoked.
    async fn revoke_all(&self, user_id: UserId) -> Result<u64, StoreError>;
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;

    fn session(expires_at: Timestamp, revoked: bool) -> Session {
        Session {
            id: 1,
            user_id: Uuid::new_v4(),
            secret_hash: "digest".to_string(),
            device_fingerprint: "device".to_string(),
            origin_address: "192.0.2.1".to_string(),
            expires_at,
            revoked,
        }
    }

    #[test]
    fn active_requires_unexpired_and_unrevoked() {
        let now = Utc::now();

        assert!(session(now + Duration::hours(1), false).is_active(now));
        assert!(!session(now + Duration::hours(1), true).is_active(now));
        assert!(!session(now - Duration::seconds(1), false).is_active(now));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let now = Utc::now();
        // A session expiring exactly now is already dead.
        assert!(!session(now, false).is_active(now));
    }
}
