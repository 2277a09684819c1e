// ============================
// console-backend/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod oracle;
pub mod session;
pub mod token_generator;
pub mod verifier;
mod service;
mod service_impl;

pub use oracle::{CommandOracle, IdentityOracle, RejectAll};
pub use session::{SessionStore, Ttl, SESSION_TTL, SWEEP_INTERVAL};
pub use service::AuthService;
pub use service_impl::{DefaultAuth, SESSION_ID_PREFIX};
pub use token_generator::generate_unique_id;
pub use verifier::CredentialVerifier;
