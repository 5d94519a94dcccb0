//! Access-token encoding and verification.
//!
//! Access tokens are HS512-signed JWTs carrying the subject user id. The
//! signing key is injected at construction so deployments can rotate keys
//! and tests can use fixed ones; the codec never reads process environment.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::types::{Timestamp, UserId};

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject -- the owning user's id.
    pub sub: UserId,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Why decoding a presented access token failed.
///
/// Callers react differently: `Expired` should prompt a refresh, the other
/// two are rejected outright.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("access token is structurally invalid")]
    Malformed,

    #[error("access token signature is invalid")]
    SignatureInvalid,

    #[error("access token has expired")]
    Expired,
}

/// Stateless encoder/verifier for access tokens.
#[derive(Clone)]
pub struct AccessTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_mins: i64,
}

impl AccessTokenCodec {
    pub fn new(secret: &[u8], ttl_mins: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_mins,
        }
    }

    /// Sign an access token for `subject`, expiring `ttl_mins` from now.
    pub fn encode(&self, subject: UserId) -> Result<String, jsonwebtoken::errors::Error> {
        self.encode_at(subject, Utc::now())
    }

    /// Sign an access token as if issued at `now`. Deterministic given
    /// identical inputs and key.
    pub fn encode_at(
        &self,
        subject: UserId,
        now: Timestamp,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: subject,
            iat,
            exp: iat + self.ttl_mins * 60,
        };
        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding)
    }

    /// Validate signature and expiry, returning the embedded [`Claims`].
    pub fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(classify)
    }

    /// Validate the signature but accept an expired token.
    ///
    /// The rotation flow uses this to learn whose sessions to search: the
    /// presented access token is usually expired (that is why the client is
    /// refreshing) but must still be one we signed, so a forged credential
    /// cannot probe another user's sessions. This is not authentication on
    /// its own -- the refresh secret still has to match a stored session.
    pub fn decode_allow_expired(&self, token: &str) -> Result<Claims, DecodeError> {
        let mut validation = Validation::new(Algorithm::HS512);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(classify)
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> DecodeError {
    match err.kind() {
        ErrorKind::ExpiredSignature => DecodeError::Expired,
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => DecodeError::SignatureInvalid,
        _ => DecodeError::Malformed,
    }
}
