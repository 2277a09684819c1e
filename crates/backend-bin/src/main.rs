use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use console_backend::{config::Settings, router, server, AppState};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Device console gateway
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = console_backend::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    /// Listen address, e.g. `:5912` or `127.0.0.1:5912`
    #[arg(short, long)]
    addr: Option<String>,
    /// Fallback username
    #[arg(short, long)]
    username: Option<String>,
    /// Fallback password
    #[arg(short, long)]
    password: Option<String>,
    /// TLS certificate (PEM)
    #[arg(long)]
    ssl_cert: Option<PathBuf>,
    /// TLS private key (PEM)
    #[arg(long)]
    ssl_key: Option<PathBuf>,
    /// Front-end asset directory
    #[arg(long)]
    static_dir: Option<PathBuf>,
    /// External password checker (pwauth protocol)
    #[arg(long)]
    auth_command: Option<PathBuf>,
    /// Log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Layer the flags over file and environment values, then check the
    /// merged result once.
    fn apply(self, mut settings: Settings) -> Result<Settings> {
        if let Some(addr) = self.addr {
            settings.bind_addr = addr;
        }
        if self.username.is_some() {
            settings.username = self.username;
        }
        if self.password.is_some() {
            settings.password = self.password;
        }
        if self.ssl_cert.is_some() {
            settings.ssl_cert = self.ssl_cert;
        }
        if self.ssl_key.is_some() {
            settings.ssl_key = self.ssl_key;
        }
        if let Some(dir) = self.static_dir {
            settings.static_dir = dir;
        }
        if self.auth_command.is_some() {
            settings.auth_command = self.auth_command;
        }
        if let Some(level) = self.log_level {
            settings.log_level = level;
        }

        let settings = settings.normalized();
        settings.validate()?;
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load_unvalidated_from(&cli.config)?;
    let settings = cli.apply(settings)?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = Arc::new(AppState::from_settings(settings.clone()));
    let app = router::create_router(state);

    if let Err(e) = server::serve(&settings, app).await {
        error!("{e:#}");
        return Err(e);
    }

    Ok(())
}
