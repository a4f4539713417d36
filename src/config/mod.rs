//! Discovery configuration.
//!
//! ```rust
//! use std::time::Duration;
//! use tool_catalog::config::DiscoveryConfig;
//!
//! let config = DiscoveryConfig::default()
//!     .with_catalog_path("/tmp/tool-catalog.json")
//!     .with_default_limit(3)
//!     .with_provider_timeout(Duration::from_secs(5));
//! assert_eq!(config.default_limit, 3);
//! ```

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::search::{DEFAULT_LIMIT, MAX_LIMIT};

pub const ENV_RULES_PATH: &str = "TOOL_CATALOG_RULES";
pub const ENV_CATALOG_PATH: &str = "TOOL_CATALOG_PATH";
pub const ENV_DEFAULT_LIMIT: &str = "TOOL_CATALOG_DEFAULT_LIMIT";
pub const ENV_PROVIDER_TIMEOUT_SECS: &str = "TOOL_CATALOG_PROVIDER_TIMEOUT_SECS";

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Value present but unusable
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryConfig {
    /// Classification rules file (JSON or YAML). Builtin rules when unset.
    pub rules_path: Option<PathBuf>,
    /// Persisted catalog location. Nothing is persisted when unset.
    pub catalog_path: Option<PathBuf>,
    pub default_limit: usize,
    pub provider_timeout: Duration,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            rules_path: None,
            catalog_path: None,
            default_limit: DEFAULT_LIMIT,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

impl DiscoveryConfig {
    pub fn with_rules_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.rules_path = Some(path.into());
        self
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit.min(MAX_LIMIT);
        self
    }

    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Defaults overridden by `TOOL_CATALOG_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_RULES_PATH).filter(|v| !v.trim().is_empty()) {
            config = config.with_rules_path(path);
        }
        if let Some(path) = lookup(ENV_CATALOG_PATH).filter(|v| !v.trim().is_empty()) {
            config = config.with_catalog_path(path);
        }
        if let Some(value) = lookup(ENV_DEFAULT_LIMIT) {
            config = config.with_default_limit(parse_number(ENV_DEFAULT_LIMIT, &value)? as usize);
        }
        if let Some(value) = lookup(ENV_PROVIDER_TIMEOUT_SECS) {
            let secs = parse_number(ENV_PROVIDER_TIMEOUT_SECS, &value)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: ENV_PROVIDER_TIMEOUT_SECS.to_string(),
                    message: "timeout must be at least one second".to_string(),
                });
            }
            config = config.with_provider_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{value:?}: {e}"),
        })
}
