// ============================
// console-backend/src/server.rs
// ============================
//! Listener setup: TLS when the certificate pair is usable, plaintext
//! otherwise.
use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::Settings;

/// A bound listening socket
pub enum Listener {
    Plain(TcpListener),
    Tls(std::net::TcpListener, RustlsConfig),
}

impl Listener {
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        match self {
            Listener::Plain(listener) => listener.local_addr(),
            Listener::Tls(listener, _) => listener.local_addr(),
        }
    }

    pub fn is_tls(&self) -> bool {
        matches!(self, Listener::Tls(..))
    }

    /// Serve until the process ends
    pub async fn serve(self, app: Router) -> Result<()> {
        match self {
            Listener::Plain(listener) => axum::serve(listener, app).await?,
            Listener::Tls(listener, tls) => {
                axum_server::from_tcp_rustls(listener, tls)
                    .serve(app.into_make_service())
                    .await?
            },
        }
        Ok(())
    }
}

/// Bind the configured address. Unusable TLS material is logged and the
/// listener falls back to plaintext; a bind failure is returned.
pub async fn bind(settings: &Settings) -> Result<Listener> {
    let addr = settings.listen_addr();

    if let Some((cert, key)) = settings.tls_material() {
        match RustlsConfig::from_pem_file(&cert, &key).await {
            Ok(tls) => {
                let listener = std::net::TcpListener::bind(&addr)
                    .with_context(|| format!("failed to bind {addr}"))?;
                listener.set_nonblocking(true)?;
                info!("Listen on: {} SSL on", settings.bind_addr);
                return Ok(Listener::Tls(listener, tls));
            },
            Err(e) => error!(
                cert = %cert.display(),
                key = %key.display(),
                "unusable TLS material: {e}"
            ),
        }
    }

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listen on: {} SSL off", settings.bind_addr);
    Ok(Listener::Plain(listener))
}

/// Bind and serve
pub async fn serve(settings: &Settings, app: Router) -> Result<()> {
    bind(settings).await?.serve(app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_plaintext_without_tls_config() {
        let settings = Settings::builder().bind_addr("127.0.0.1:0").build().unwrap();
        let listener = bind(&settings).await.unwrap();
        assert!(!listener.is_tls());
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_missing_cert_falls_back_to_plaintext() {
        let dir = tempdir().unwrap();
        let key = dir.path().join("key.pem");
        std::fs::write(&key, "key").unwrap();

        let settings = Settings::builder()
            .bind_addr("127.0.0.1:0")
            .tls(dir.path().join("missing.pem"), &key)
            .build()
            .unwrap();
        assert!(!bind(&settings).await.unwrap().is_tls());
    }

    #[tokio::test]
    async fn test_garbage_pem_falls_back_to_plaintext() {
        let dir = tempdir().unwrap();
        let cert = dir.path().join("cert.pem");
        let key = dir.path().join("key.pem");
        std::fs::write(&cert, "not a certificate").unwrap();
        std::fs::write(&key, "not a key").unwrap();

        let settings = Settings::builder()
            .bind_addr("127.0.0.1:0")
            .tls(&cert, &key)
            .build()
            .unwrap();
        assert!(!bind(&settings).await.unwrap().is_tls());
    }

    #[tokio::test]
    async fn test_valid_pem_pair_serves_tls() {
        let dir = tempdir().unwrap();
        let cert = dir.path().join("cert.pem");
        let key = dir.path().join("key.pem");
        let pair = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        std::fs::write(&cert, pair.cert.pem()).unwrap();
        std::fs::write(&key, pair.key_pair.serialize_pem()).unwrap();

        let settings = Settings::builder()
            .bind_addr("127.0.0.1:0")
            .tls(&cert, &key)
            .build()
            .unwrap();
        let listener = bind(&settings).await.unwrap();
        assert!(listener.is_tls());
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_failure_is_an_error() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let settings = Settings::builder().bind_addr(addr.to_string()).build().unwrap();
        assert!(bind(&settings).await.is_err());
    }
}
