use std::sync::Arc;

use async_trait::async_trait;
use console_common::Credentials;
use metrics::counter;
use tracing::{info, warn};

use crate::auth::{generate_unique_id, AuthService, CredentialVerifier, SessionStore, Ttl};
use crate::metrics::{SIGNIN_ACCEPTED, SIGNIN_REJECTED};

/// Namespace of tokens issued by `/signin`
pub const SESSION_ID_PREFIX: &str = "http";

pub struct DefaultAuth {
    verifier: CredentialVerifier,
    sessions: Arc<SessionStore>,
}

impl DefaultAuth {
    pub fn new(verifier: CredentialVerifier, sessions: Arc<SessionStore>) -> Self {
        Self { verifier, sessions }
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn sign_in(&self, creds: &Credentials) -> Option<String> {
        if !self.verifier.verify(creds).await {
            counter!(SIGNIN_REJECTED).increment(1);
            warn!(username = %creds.username, "sign-in rejected");
            return None;
        }

        let sid = generate_unique_id(SESSION_ID_PREFIX);
        self.sessions.create(sid.clone(), Ttl::Default);

        counter!(SIGNIN_ACCEPTED).increment(1);
        info!(username = %creds.username, "sign-in accepted");
        Some(sid)
    }

    async fn authorize(&self, token: &str) -> bool {
        // get and refresh in one step; an entry expiring in between is not revived
        self.sessions.refresh(token)
    }

    async fn sign_out(&self, token: &str) -> bool {
        self.sessions.delete(token)
    }
}
