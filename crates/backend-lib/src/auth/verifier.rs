//! Credential verification chain.
use std::sync::Arc;

use console_common::Credentials;
use tracing::debug;

use super::oracle::IdentityOracle;
use crate::config::Settings;

/// Checks credentials against the system oracle, then against the statically
/// configured fallback identity. The first accepting tier wins.
#[derive(Clone)]
pub struct CredentialVerifier {
    oracle: Arc<dyn IdentityOracle>,
    username: Option<String>,
    password: Option<String>,
}

impl CredentialVerifier {
    pub fn new(
        oracle: Arc<dyn IdentityOracle>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        Self {
            oracle,
            username: username.filter(|u| !u.is_empty()),
            password: password.filter(|p| !p.is_empty()),
        }
    }

    pub fn from_settings(oracle: Arc<dyn IdentityOracle>, settings: &Settings) -> Self {
        Self::new(oracle, settings.username.clone(), settings.password.clone())
    }

    /// Accept or reject a sign-in attempt
    pub async fn verify(&self, creds: &Credentials) -> bool {
        if self
            .oracle
            .authenticate(&creds.username, &creds.password)
            .await
        {
            debug!(username = %creds.username, "accepted by system identity check");
            return true;
        }

        self.static_fallback(creds)
    }

    /// The configured identity. With no password configured, any password
    /// is accepted for the configured username.
    pub fn static_fallback(&self, creds: &Credentials) -> bool {
        let Some(username) = &self.username else {
            return false;
        };

        if *username != creds.username {
            return false;
        }

        match &self.password {
            Some(password) => *password == creds.password,
            None => true,
        }
    }
}
