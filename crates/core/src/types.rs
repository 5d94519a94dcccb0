/// Session primary keys are PostgreSQL BIGSERIAL.
pub type SessionId = i64;

/// Users are identified by an externally assigned UUID.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
