// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! This module defines the `AuthService` trait, the seam between HTTP
//! handlers and the verifier/session store pair.
use async_trait::async_trait;
use console_common::Credentials;

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify credentials and mint a session token on success
    async fn sign_in(&self, creds: &Credentials) -> Option<String>;
    /// Check a session token and slide its expiry on success
    async fn authorize(&self, token: &str) -> bool;
    /// Drop a session immediately
    async fn sign_out(&self, token: &str) -> bool;
}
