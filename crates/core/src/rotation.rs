//! The rotation state machine: consume a presented refresh credential,
//! classify the request as normal / device-changed / origin-changed, and
//! drive revocation and re-issuance.

use std::sync::Arc;

use crate::error::AuthError;
use crate::issuer::{TokenIssuer, TokenPair};
use crate::notify::{NotificationSink, OriginChange};
use crate::secret::SecretHasher;
use crate::session::SessionStore;
use crate::token::AccessTokenCodec;

/// Shared 401 message for "no sessions", "no matching secret", and "lost
/// the rotation race", so a caller cannot tell which case occurred.
const GENERIC_REFRESH_REJECTION: &str = "No active sessions found or refresh token is invalid";

/// Validates a presented refresh credential against stored sessions and
/// rotates it, cascading revocation on anomalies.
pub struct RotationGuard {
    codec: AccessTokenCodec,
    hasher: SecretHasher,
    store: Arc<dyn SessionStore>,
    issuer: TokenIssuer,
    sink: Arc<dyn NotificationSink>,
}

impl RotationGuard {
    pub fn new(
        codec: AccessTokenCodec,
        hasher: SecretHasher,
        store: Arc<dyn SessionStore>,
        issuer: TokenIssuer,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            codec,
            hasher,
            store,
            issuer,
            sink,
        }
    }

    /// Exchange a valid refresh secret for a new token pair, invalidating
    /// the consumed one.
    ///
    /// The presented access token may be expired but must carry our
    /// signature; it only selects whose sessions to search. Proof of
    /// possession is the refresh secret matching a stored hash.
    pub async fn refresh(
        &self,
        access_token: &str,
        refresh_secret: &str,
        device_fingerprint: &str,
        origin_address: &str,
    ) -> Result<TokenPair, AuthError> {
        // 1. Whose sessions to search. Signature-checked, expiry waived.
        let claims = self
            .codec
            .decode_allow_expired(access_token)
            .map_err(|_| AuthError::Unauthenticated("Invalid access token".into()))?;
        let user_id = claims.sub;

        // 2. Every device currently holding a live refresh credential.
        let sessions = self.store.find_active(user_id).await?;
        if sessions.is_empty() {
            return Err(AuthError::Unauthenticated(
                GENERIC_REFRESH_REJECTION.into(),
            ));
        }

        // 3. Scan in returned order; first structural match wins.
        let matched = sessions
            .iter()
            .find(|s| self.hasher.verify(refresh_secret, &s.secret_hash))
            .ok_or_else(|| AuthError::Unauthenticated(GENERIC_REFRESH_REJECTION.into()))?;

        // 4. Device change: a secret presented from an unexpected device is
        // treated as stolen, so the entire session family is invalidated.
        // The cascade is final for this request; even a storage error does
        // not change the response.
        if matched.device_fingerprint != device_fingerprint {
            tracing::warn!(
                %user_id,
                session_id = matched.id,
                "device fingerprint mismatch on refresh, revoking all sessions"
            );
            if let Err(e) = self.store.revoke_all(user_id).await {
                tracing::error!(%user_id, error = %e, "revocation cascade failed");
            }
            return Err(AuthError::SecurityViolation(
                "Device mismatch. All sessions have been revoked.".into(),
            ));
        }

        // 5. Origin change alone is tolerated (mobile networks roam).
        // Tell the side channel and keep going regardless of its fate.
        if matched.origin_address != origin_address {
            tracing::info!(
                %user_id,
                old_origin = %matched.origin_address,
                new_origin = %origin_address,
                "origin address changed on refresh"
            );
            self.sink.notify(OriginChange {
                user_id,
                old_origin: matched.origin_address.clone(),
                new_origin: origin_address.to_string(),
            });
        }

        // 6. Consume the matched secret. The conditional revoke decides the
        // winner under concurrent rotations of the same secret; losing is
        // indistinguishable from never matching.
        let won = self.store.revoke_one(matched.id).await?;
        if !won {
            return Err(AuthError::Unauthenticated(
                GENERIC_REFRESH_REJECTION.into(),
            ));
        }

        // 7. Issue the replacement pair.
        self.issuer
            .create_token_pair(user_id, device_fingerprint, origin_address)
            .await
    }
}
