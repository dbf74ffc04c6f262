//! Server configuration.
//!
//! Read from a TOML file (`pizzaria.toml` by default). Every field has a
//! default, so an absent file or section yields a runnable local setup:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8080"
//!
//! [admin]
//! usuario = "admin"
//! senha = "troque-me"
//! sessao_minutos = 480
//!
//! [log]
//! filter = "info,pizzaria_operations=debug"
//! format = "json"
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "pizzaria.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

/// The single back-office account.
///
/// An empty `senha` disables login entirely.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    #[serde(rename = "usuario")]
    pub username: String,
    #[serde(rename = "senha")]
    pub secret: String,
    #[serde(rename = "sessao_minutos")]
    pub session_minutes: i64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            secret: String::new(),
            session_minutes: 8 * 60,
        }
    }
}

impl AdminConfig {
    /// Session lifetime, at least a minute. Values too large for a
    /// `chrono::Duration` saturate to the maximum.
    #[must_use]
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::try_minutes(self.session_minutes.max(1))
            .unwrap_or(chrono::Duration::MAX)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence when set.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load `path`, or `pizzaria.toml` in the working directory if no path is
    /// given. Without an explicit path a missing file means defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid config.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    /// # Errors
    ///
    /// Returns an error if `content` is not valid TOML for this config.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
