//! Origin-change notification seam.

use crate::types::UserId;

/// Event emitted when a refresh arrives from a new network origin while the
/// device fingerprint still matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginChange {
    pub user_id: UserId,
    pub old_origin: String,
    pub new_origin: String,
}

/// Best-effort side channel informed of origin changes.
///
/// `notify` must not block and must not fail the calling rotation: accept
/// the event (typically by enqueueing it) or drop it. Delivery is
/// at-most-once with no retry.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, change: OriginChange);
}
