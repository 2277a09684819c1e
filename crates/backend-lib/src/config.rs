// ============================
// console-backend/src/config.rs
// ============================
//! Configuration management.
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Default configuration file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "console.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CONSOLE_";

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Listen address, `host:port` or `:port` for all interfaces
    pub bind_addr: String,
    /// Fallback username accepted when the system check rejects
    pub username: Option<String>,
    /// Fallback password; unset means any password for `username`
    pub password: Option<String>,
    /// TLS certificate (PEM)
    pub ssl_cert: Option<PathBuf>,
    /// TLS private key (PEM)
    pub ssl_key: Option<PathBuf>,
    /// Directory holding the front-end assets
    pub static_dir: PathBuf,
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// External password checker, pwauth protocol
    pub auth_command: Option<PathBuf>,
    /// Session store tuning
    pub session: SessionSettings,
}

/// Session lifetime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Idle lifetime of a session in seconds
    pub ttl_secs: u64,
    /// How often expired sessions are swept, in seconds
    pub sweep_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: ":5912".to_string(),
            username: None,
            password: None,
            ssl_cert: None,
            ssl_key: None,
            static_dir: PathBuf::from("www"),
            log_level: "info".to_string(),
            auth_command: None,
            session: SessionSettings::default(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_secs: 30 * 60,
            sweep_interval_secs: 5,
        }
    }
}

impl SessionSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Settings {
    /// Load settings from `console.toml` and `CONSOLE_*` environment variables
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load settings from an explicit file, still honouring the environment
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = Self::load_unvalidated_from(path)?.normalized();
        settings.validate()?;
        Ok(settings)
    }

    /// Merge defaults, file and environment without checking the result.
    ///
    /// Callers layering further overrides on top (command-line flags) must
    /// call [`Settings::normalized`] and [`Settings::validate`] themselves.
    pub fn load_unvalidated_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?)
    }

    /// Start building settings from defaults
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Treat empty strings as "not configured"
    pub fn normalized(mut self) -> Self {
        self.username = self.username.filter(|u| !u.is_empty());
        self.password = self.password.filter(|p| !p.is_empty());
        self.ssl_cert = self.ssl_cert.filter(|p| !p.as_os_str().is_empty());
        self.ssl_key = self.ssl_key.filter(|p| !p.as_os_str().is_empty());
        self.auth_command = self.auth_command.filter(|p| !p.as_os_str().is_empty());
        self
    }

    /// Check the settings for values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.trim().is_empty() {
            bail!("bind_addr must not be empty");
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            bail!("invalid log level: {}", self.log_level);
        }
        if self.session.ttl_secs == 0 {
            bail!("session.ttl_secs must be greater than zero");
        }
        if self.session.sweep_interval_secs == 0 {
            bail!("session.sweep_interval_secs must be greater than zero");
        }
        if self.session.sweep_interval_secs > self.session.ttl_secs {
            bail!("session.sweep_interval_secs must not exceed session.ttl_secs");
        }
        if self.password.is_some() && self.username.is_none() {
            warn!("fallback password is set without a fallback username and will never match");
        }
        Ok(())
    }

    /// Listen address with a `:port` shorthand expanded to all interfaces
    pub fn listen_addr(&self) -> String {
        if self.bind_addr.starts_with(':') {
            format!("0.0.0.0{}", self.bind_addr)
        } else {
            self.bind_addr.clone()
        }
    }

    /// Certificate and key paths, if both are configured and present on disk.
    ///
    /// A missing file is logged and turns TLS off; startup carries on in
    /// plaintext.
    pub fn tls_material(&self) -> Option<(PathBuf, PathBuf)> {
        let (cert, key) = match (&self.ssl_cert, &self.ssl_key) {
            (Some(cert), Some(key)) => (cert, key),
            _ => return None,
        };

        let mut usable = true;
        for path in [cert, key] {
            if let Err(e) = std::fs::symlink_metadata(path) {
                error!(path = %path.display(), "{e}");
                usable = false;
            }
        }

        usable.then(|| (cert.clone(), key.clone()))
    }
}

/// Builder for [`Settings`]
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.settings.bind_addr = addr.into();
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.settings.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.settings.password = Some(password.into());
        self
    }

    pub fn tls(mut self, cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        self.settings.ssl_cert = Some(cert.into());
        self.settings.ssl_key = Some(key.into());
        self
    }

    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.settings.static_dir = dir.into();
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.settings.log_level = level.into();
        self
    }

    pub fn auth_command(mut self, command: impl Into<PathBuf>) -> Self {
        self.settings.auth_command = Some(command.into());
        self
    }

    pub fn session_ttl(mut self, secs: u64) -> Self {
        self.settings.session.ttl_secs = secs;
        self
    }

    pub fn sweep_interval(mut self, secs: u64) -> Self {
        self.settings.session.sweep_interval_secs = secs;
        self
    }

    pub fn build(self) -> Result<Settings> {
        let settings = self.settings.normalized();
        settings.validate()?;
        Ok(settings)
    }
}
