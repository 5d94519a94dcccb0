//! Refresh-secret generation and keyed hashing.
//!
//! Refresh secrets are 256-bit random values transported base64-url. The
//! secret is already unguessable, so at-rest protection uses a keyed fast
//! hash (HMAC-SHA256) rather than an adaptive password hash: a leaked table
//! of digests is useless without the server-side key, and verification
//! costs microseconds instead of tens of milliseconds per request.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Number of random bytes in a refresh secret (256 bits).
const SECRET_LEN: usize = 32;

/// Generate a cryptographically random refresh secret, base64-url encoded.
///
/// The plaintext exists only between minting and hashing, and on the wire
/// to the client; it is never persisted.
pub fn generate_refresh_secret() -> String {
    let mut bytes = [0u8; SECRET_LEN];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Keyed one-way hash of refresh secrets for at-rest storage.
#[derive(Clone)]
pub struct SecretHasher {
    mac: HmacSha256,
}

impl SecretHasher {
    pub fn new(key: &[u8]) -> Self {
        // HMAC accepts keys of any length, so this cannot fail.
        let mac = HmacSha256::new_from_slice(key).expect("HMAC-SHA256 accepts any key length");
        Self { mac }
    }

    /// Digest a refresh secret for storage (base64-url, no padding).
    pub fn hash(&self, secret: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(secret.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }

    /// Check a presented secret against a stored digest.
    ///
    /// Reports mismatch only, never why; the comparison inside
    /// `verify_slice` is constant-time.
    pub fn verify(&self, secret: &str, digest: &str) -> bool {
        let Ok(expected) = URL_SAFE_NO_PAD.decode(digest) else {
            return false;
        };
        let mut mac = self.mac.clone();
        mac.update(secret.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}
