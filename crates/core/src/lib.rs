//! keygate-core: the token/session lifecycle engine.
//!
//! Issues paired short-lived access tokens and long-lived rotating refresh
//! secrets, and detects credential theft by binding each refresh session to
//! the requesting device and network origin. This crate contains the
//! security-relevant rules only; HTTP routing, configuration, and the
//! PostgreSQL store live in `keygate-api` and `keygate-db` and are consumed
//! through the seams defined here ([`session::SessionStore`],
//! [`notify::NotificationSink`]).

pub mod error;
pub mod issuer;
pub mod notify;
pub mod rotation;
pub mod secret;
pub mod session;
pub mod token;
pub mod types;
