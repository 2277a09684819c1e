//! System identity checks the verifier consults before its static fallback.
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::{io::AsyncWriteExt, process::Command};
use tracing::{debug, error};

/// Pass/fail oracle backed by something outside this server, usually the
/// host's own account database.
#[async_trait]
pub trait IdentityOracle: Send + Sync {
    async fn authenticate(&self, username: &str, password: &str) -> bool;
}

/// Oracle that never accepts; used when no system checker is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAll;

#[async_trait]
impl IdentityOracle for RejectAll {
    async fn authenticate(&self, _username: &str, _password: &str) -> bool {
        false
    }
}

/// Runs an external checker speaking the pwauth protocol: the username and
/// the password are written to its stdin on separate lines, and exit status
/// zero means the pair is valid.
#[derive(Debug, Clone)]
pub struct CommandOracle {
    program: PathBuf,
}

impl CommandOracle {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }

    async fn run(&self, username: &str, password: &str) -> std::io::Result<bool> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            let input = format!("{username}\n{password}\n");
            // a checker may exit before reading everything
            if let Err(e) = stdin.write_all(input.as_bytes()).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e);
                }
            }
        }

        Ok(child.wait().await?.success())
    }
}

#[async_trait]
impl IdentityOracle for CommandOracle {
    async fn authenticate(&self, username: &str, password: &str) -> bool {
        // a newline would let the caller smuggle in a second field
        if username.contains('\n') || password.contains('\n') {
            return false;
        }

        match self.run(username, password).await {
            Ok(accepted) => {
                debug!(%username, accepted, "system identity check finished");
                accepted
            },
            Err(e) => {
                error!(program = %self.program.display(), "identity checker failed: {e}");
                false
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reject_all() {
        assert!(!RejectAll.authenticate("root", "root").await);
    }

    #[tokio::test]
    async fn test_missing_program_rejects() {
        let oracle = CommandOracle::new("/nonexistent/definitely-not-here");
        assert!(!oracle.authenticate("root", "root").await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_status_decides() {
        assert!(CommandOracle::new("true").authenticate("root", "pw").await);
        assert!(!CommandOracle::new("false").authenticate("root", "pw").await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_newline_in_credentials_rejected() {
        let oracle = CommandOracle::new("true");
        assert!(!oracle.authenticate("root\nother", "pw").await);
        assert!(!oracle.authenticate("root", "pw\nextra").await);
    }
}
