/// Domain error taxonomy for the token lifecycle engine.
///
/// The HTTP layer maps these onto status codes: `InvalidInput` is 400,
/// `Unauthenticated` and `SecurityViolation` are 401 (the latter with a
/// distinct message because a revocation cascade already ran), and
/// `Unavailable`/`Internal` are 500 with sanitized bodies.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthorized: {0}")]
    Unauthenticated(String),

    #[error("Security violation: {0}")]
    SecurityViolation(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures surfaced by a session store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => AuthError::Unavailable(msg),
        }
    }
}
