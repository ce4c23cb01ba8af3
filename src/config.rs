//! Adapter configuration
//!
//! Loaded from a JSON file, every field optional. Connection settings are not
//! part of this: the store handle is built by the caller.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a qualified identifier naming another collection is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossCollectionPolicy {
    /// Emit `table.column` verbatim
    #[default]
    Literal,
    /// Fail compilation with `UnresolvedReference`
    Reject,
}

/// Acknowledgement mode for writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteConcern {
    /// Wait for the store to acknowledge and report a count
    #[serde(default = "default_safe")]
    pub safe: bool,
}

fn default_safe() -> bool {
    true
}

impl Default for WriteConcern {
    fn default() -> Self {
        Self {
            safe: default_safe(),
        }
    }
}

/// Adapter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Write acknowledgement for updates (default: safe)
    #[serde(default)]
    pub write_concern: WriteConcern,

    /// Rendering of references to other collections (default: literal)
    #[serde(default)]
    pub cross_collection: CrossCollectionPolicy,

    /// Emit one INFO event per store call (default: true)
    #[serde(default = "default_log_queries")]
    pub log_queries: bool,

    /// Tracing filter used by the CLI when `--log` is absent
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_queries() -> bool {
    true
}

fn default_log_filter() -> String {
    "docbridge=info".to_string()
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            write_concern: WriteConcern::default(),
            cross_collection: CrossCollectionPolicy::default(),
            log_queries: default_log_queries(),
            log_filter: default_log_filter(),
        }
    }
}

impl AdapterConfig {
    /// Parse a configuration from JSON text
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn with_cross_collection(mut self, policy: CrossCollectionPolicy) -> Self {
        self.cross_collection = policy;
        self
    }

    pub fn with_write_concern(mut self, safe: bool) -> Self {
        self.write_concern = WriteConcern { safe };
        self
    }
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "DOCBRIDGE_CONFIG_IO",
            ConfigError::Parse(_) => "DOCBRIDGE_CONFIG_INVALID",
        }
    }
}
