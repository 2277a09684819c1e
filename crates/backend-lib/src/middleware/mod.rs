// crates/backend-lib/src/middleware/mod.rs

//! Middleware for the console gateway.

pub mod auth;
pub mod cors;

pub use auth::{require_session, session_cookie, SESSION_COOKIE};
pub use cors::allow_origin;

#[cfg(test)]
mod tests;
