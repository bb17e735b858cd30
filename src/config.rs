//! Service configuration from environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `HOST` | `0.0.0.0` | Bind address |
//! | `PORT` | `8001` | Bind port |
//! | `LOG_FORMAT` | `json` | `json` or `pretty` |
//! | `EXACT_NODE_LIMIT` | `24` | Largest component searched exhaustively |
//! | `SEARCH_EXPANSION_BUDGET` | `2000000` | DFS steps per exact search |
//! | `MAX_MESSAGE_BYTES` | `16777216` | Largest accepted HTTP body / WebSocket message |

use std::str::FromStr;

use crate::oracle::{DEFAULT_EXACT_NODE_LIMIT, DEFAULT_EXPANSION_BUDGET};

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8001;

/// Default maximum payload size (16 MiB).
pub const DEFAULT_MAX_MESSAGE_BYTES: usize = 16 * 1024 * 1024;

/// Error type for configuration loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but does not parse.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Human-readable output for local development.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(()),
        }
    }
}

/// Runtime configuration of the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Log output format.
    pub log_format: LogFormat,
    /// Largest component searched exhaustively.
    pub exact_node_limit: usize,
    /// DFS steps allowed per exact search.
    pub expansion_budget: u64,
    /// Largest accepted payload in bytes.
    pub max_message_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            log_format: LogFormat::Json,
            exact_node_limit: DEFAULT_EXACT_NODE_LIMIT,
            expansion_budget: DEFAULT_EXPANSION_BUDGET,
            max_message_bytes: DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}

impl ServiceConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable lookup. Unset variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            log_format: parse_var(&lookup, "LOG_FORMAT", defaults.log_format)?,
            exact_node_limit: parse_var(&lookup, "EXACT_NODE_LIMIT", defaults.exact_node_limit)?,
            expansion_budget: parse_var(&lookup, "SEARCH_EXPANSION_BUDGET", defaults.expansion_budget)?,
            max_message_bytes: parse_var(&lookup, "MAX_MESSAGE_BYTES", defaults.max_message_bytes)?,
        })
    }

    /// `host:port` bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}
