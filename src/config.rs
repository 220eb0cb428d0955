//! Server configuration.
//!
//! [`ServerConfig`] holds everything the binary needs to start: where the document
//! lives, which address to bind and how door ids are assigned. Values come from the
//! builder, or from `DOORSTORE_*` environment variables via [`ServerConfig::from_env`].
//!
//! ```rust
//! use doorstore::config::ServerConfig;
//! use doorstore::ids::IdStrategy;
//!
//! let config = ServerConfig::builder()
//!     .data_path("/var/lib/doorstore/db.json")
//!     .port(9000)
//!     .id_strategy(IdStrategy::CollectionLength)
//!     .build();
//! assert_eq!(config.bind_address(), "127.0.0.1:9000");
//! ```

use crate::ids::IdStrategy;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "DOORSTORE_DB_PATH";
pub const ENV_HOST: &str = "DOORSTORE_HOST";
pub const ENV_PORT: &str = "DOORSTORE_PORT";
pub const ENV_ID_STRATEGY: &str = "DOORSTORE_ID_STRATEGY";

pub const DEFAULT_DB_PATH: &str = "db.json";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {variable}: {reason}")]
    InvalidValue {
        variable: String,
        value: String,
        reason: String,
    },
}

/// Configuration for the door server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Path of the JSON document
    pub data_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub id_strategy: IdStrategy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DB_PATH),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            id_strategy: IdStrategy::default(),
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Read configuration from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
            builder = builder.data_path(path);
        }
        if let Some(host) = lookup(ENV_HOST).filter(|v| !v.trim().is_empty()) {
            builder = builder.host(host.trim());
        }
        if let Some(port) = lookup(ENV_PORT) {
            let parsed = port.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                variable: ENV_PORT.to_string(),
                value: port.clone(),
                reason: e.to_string(),
            })?;
            builder = builder.port(parsed);
        }
        if let Some(strategy) = lookup(ENV_ID_STRATEGY) {
            let parsed = strategy
                .parse::<IdStrategy>()
                .map_err(|reason| ConfigError::InvalidValue {
                    variable: ENV_ID_STRATEGY.to_string(),
                    value: strategy.clone(),
                    reason,
                })?;
            builder = builder.id_strategy(parsed);
        }

        Ok(builder.build())
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_path = path.into();
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn id_strategy(mut self, id_strategy: IdStrategy) -> Self {
        self.config.id_strategy = id_strategy;
        self
    }

    pub fn build(self) -> ServerConfig {
        self.config
    }
}
