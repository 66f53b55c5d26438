//! Server configuration read from environment variables.
//!
//! - `KVGRAPH_DB_PATH`: SQLite database file path. Unset or `:memory:`
//!   selects the in-memory store.
//! - `KVGRAPH_PORT`: listen port (default 3000).
//! - `KVGRAPH_SWEEP_SECS`: idle actor lane sweep interval (default 60).

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SWEEP_SECS: u64 = 60;

/// Sentinel path selecting the in-memory store.
pub const MEMORY_DB: &str = ":memory:";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// SQLite path; `None` selects the in-memory store.
    pub db_path: Option<String>,
    pub port: u16,
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            db_path: None,
            port: DEFAULT_PORT,
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_SECS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_path = lookup("KVGRAPH_DB_PATH").filter(|p| !p.is_empty() && p != MEMORY_DB);

        let port = match lookup("KVGRAPH_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: "KVGRAPH_PORT",
                expected: "a port number",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let sweep_secs = match lookup("KVGRAPH_SWEEP_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "KVGRAPH_SWEEP_SECS",
                        expected: "a positive number of seconds",
                        value: raw,
                    })
                }
            },
            None => DEFAULT_SWEEP_SECS,
        };

        Ok(ServerConfig {
            db_path,
            port,
            sweep_interval: Duration::from_secs(sweep_secs),
        })
    }
}
