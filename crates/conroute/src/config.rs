// File: src/config.rs
// Purpose: Configuration parsing from conroute.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "conroute.toml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub engine: EngineConfig,
}

/// Listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Backend engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum request body size in bytes (default: 2 MiB)
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,

    /// Install the request logger on the root group (default: true)
    #[serde(default = "default_true")]
    pub request_log: bool,

    /// Turn handler panics into 500 responses (default: true)
    #[serde(default = "default_true")]
    pub catch_panic: bool,
}

// Default values
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9000
}

fn default_body_limit() -> usize {
    2 * 1024 * 1024
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            body_limit: default_body_limit(),
            request_log: true,
            catch_panic: true,
        }
    }
}

impl EngineConfig {
    /// No logger, no panic catching
    pub fn bare() -> Self {
        Self {
            request_log: false,
            catch_panic: false,
            ..Self::default()
        }
    }
}

impl ServerConfig {
    /// `host:port` listen address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the default configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load configuration from default path (./conroute.toml)
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(DEFAULT_CONFIG_FILE)
    }

    pub fn address(&self) -> String {
        self.server.address()
    }
}
