// ============================
// console-backend/src/lib.rs
// ============================
//! Authentication and session gateway for the device console.

pub mod auth;
pub mod broker;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod server;

use std::sync::Arc;

use crate::auth::{
    AuthService, CommandOracle, CredentialVerifier, DefaultAuth, IdentityOracle, RejectAll,
    SessionStore,
};
use crate::broker::{DeviceBroker, DeviceRegistry};
use crate::config::Settings;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Sign-in and session checks
    pub auth: Arc<dyn AuthService>,
    /// Session table behind `auth`
    pub sessions: Arc<SessionStore>,
    /// Immutable process configuration
    pub settings: Arc<Settings>,
    /// Connected devices
    pub broker: Arc<dyn DeviceRegistry>,
}

impl AppState {
    /// Wire the state together and start the session sweeper.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(
        settings: Settings,
        oracle: Arc<dyn IdentityOracle>,
        broker: Arc<dyn DeviceRegistry>,
    ) -> Self {
        let sessions = SessionStore::start(&settings.session);
        let verifier = CredentialVerifier::from_settings(oracle, &settings);
        let auth = Arc::new(DefaultAuth::new(verifier, sessions.clone()));

        Self {
            auth,
            sessions,
            settings: Arc::new(settings),
            broker,
        }
    }

    /// State with the oracle named by the settings and an in-process broker
    pub fn from_settings(settings: Settings) -> Self {
        let oracle: Arc<dyn IdentityOracle> = match &settings.auth_command {
            Some(program) => Arc::new(CommandOracle::new(program)),
            None => Arc::new(RejectAll),
        };
        Self::new(settings, oracle, Arc::new(DeviceBroker::new()))
    }
}
