//! HTTP surface for token issuance, rotation, and revocation.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod notify;
pub mod routes;
pub mod state;
