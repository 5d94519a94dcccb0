//! Minting of fresh token pairs and their backing session records.

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::error::AuthError;
use crate::secret::{generate_refresh_secret, SecretHasher};
use crate::session::{NewSession, SessionStore};
use crate::token::AccessTokenCodec;
use crate::types::UserId;

/// A freshly minted credential pair. Never persisted; the refresh secret
/// exists in plaintext only here and on the wire to the client.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_secret: String,
}

/// Composes the codec, hasher, and store to mint a token pair plus its
/// backing session record.
#[derive(Clone)]
pub struct TokenIssuer {
    codec: AccessTokenCodec,
    hasher: SecretHasher,
    store: Arc<dyn SessionStore>,
    refresh_ttl_hours: i64,
}

impl TokenIssuer {
    pub fn new(
        codec: AccessTokenCodec,
        hasher: SecretHasher,
        store: Arc<dyn SessionStore>,
        refresh_ttl_hours: i64,
    ) -> Self {
        Self {
            codec,
            hasher,
            store,
            refresh_ttl_hours,
        }
    }

    /// Mint a token pair for `user_id` and persist the backing session.
    ///
    /// The store write is the last step, so a failure leaves no orphaned
    /// state: either the whole pair exists or none of it does.
    pub async fn create_token_pair(
        &self,
        user_id: UserId,
        device_fingerprint: &str,
        origin_address: &str,
    ) -> Result<TokenPair, AuthError> {
        let refresh_secret = generate_refresh_secret();

        let access_token = self
            .codec
            .encode(user_id)
            .map_err(|e| AuthError::Internal(format!("access token encoding failed: {e}")))?;

        let session = NewSession {
            user_id,
            secret_hash: self.hasher.hash(&refresh_secret),
            device_fingerprint: device_fingerprint.to_string(),
            origin_address: origin_address.to_string(),
            expires_at: Utc::now() + Duration::hours(self.refresh_ttl_hours),
        };

        self.store
            .create(session)
            .await
            .map_err(|e| AuthError::Internal(format!("session creation failed: {e}")))?;

        Ok(TokenPair {
            access_token,
            refresh_secret,
        })
    }
}
