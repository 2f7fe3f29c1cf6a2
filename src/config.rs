//! Server configuration
//!
//! Defaults suit a local checkout; each field can be overridden through the
//! environment (a `.env` file is loaded by the binary before this is read).

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

pub const ENV_PORT: &str = "PORT";
pub const ENV_DATABASE: &str = "VALENTINE_DATABASE";
pub const ENV_PUBLIC_DIR: &str = "VALENTINE_PUBLIC_DIR";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name} value {value:?}: expected a port number")]
    InvalidPort { name: &'static str, value: String },
}

/// Backend settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// TCP port, bound on all interfaces
    pub port: u16,
    /// SQLite database file
    pub database_path: PathBuf,
    /// Directory of static page assets
    pub public_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_path: PathBuf::from("database/valentine.db"),
            public_dir: PathBuf::from("public"),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_PORT).filter(|v| !v.trim().is_empty()) {
            config.port = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort {
                    name: ENV_PORT,
                    value: value.clone(),
                })?;
        }
        if let Some(value) = lookup(ENV_DATABASE).filter(|v| !v.is_empty()) {
            config.database_path = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_PUBLIC_DIR).filter(|v| !v.is_empty()) {
            config.public_dir = PathBuf::from(value);
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}
