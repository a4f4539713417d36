//! # tool-catalog
//!
//! Unified discovery catalog for tools gathered from many providers (MCP
//! servers, Rust crates, subagents, builtins) with hybrid BM25 and regex
//! search.
//!
//! Tools are normalized into [`ToolEntry`] records, classified by ordered
//! rules, assigned a loading priority, and indexed once per build. Only
//! `always` tools need to be surfaced up front; everything else is found
//! through [`ToolDiscovery::search`].
//!
//! ## Quick Start
//!
//! ```rust
//! use tool_catalog::{
//!     DiscoveryConfig, ProviderRegistry, RawToolDescriptor, SearchOptions, StaticProvider,
//!     ToolDiscovery, ToolSource, rules::ClassificationRules,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tool_catalog::Error> {
//!     let providers = ProviderRegistry::new().with(
//!         StaticProvider::new("mcp", ToolSource::Mcp).server(
//!             "gh",
//!             vec![RawToolDescriptor::new("github_create_issue", "Create a new issue")],
//!         ),
//!     );
//!
//!     let discovery = ToolDiscovery::new(
//!         DiscoveryConfig::default(),
//!         ClassificationRules::builtin(),
//!         providers,
//!     );
//!     discovery.rebuild_catalog().await?;
//!
//!     let hits = discovery.search("create issue", SearchOptions::new().limit(3))?;
//!     assert_eq!(hits[0].entry.id, "mcp:gh:github_create_issue");
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod catalog;
pub mod config;
pub mod discovery;
pub mod providers;
pub mod rules;
pub mod search;
pub mod text;
pub mod types;

pub use catalog::{Catalog, CatalogBuilder, CatalogIndexes, CatalogStore, ProviderBatch};
pub use config::{ConfigError, DiscoveryConfig};
pub use discovery::{CatalogStats, RebuildStatus, RebuildSummary, ToolDiscovery};
pub use providers::{
    Collection, FailedProvider, FileProvider, ProviderError, ProviderRegistry, StaticProvider,
    ToolProvider,
};
pub use rules::{ClassificationRules, RulesConfig, RulesError};
pub use search::{FieldKind, SearchEngine, SearchHit, SearchKind, SearchOptions};
pub use types::{Priority, RawToolDescriptor, ToolEntry, ToolSource};

/// Error type for tool-catalog operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Search pattern exceeds the accepted length.
    #[error("Pattern too long: {length} characters (max {max})")]
    PatternTooLong { length: usize, max: usize },

    /// Search pattern does not compile.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A tool provider could not be listed.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Invalid or missing configuration, including classification rules.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed caller input, reported immediately
    Validation,
    /// Provider failures during collection
    Ingestion,
    /// Configuration or rules errors
    Configuration,
    /// Internal errors (IO, JSON)
    Internal,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::PatternTooLong { .. } | Error::InvalidPattern { .. } => {
                ErrorCategory::Validation
            }
            Error::Provider(_) => ErrorCategory::Ingestion,
            Error::Config(_) => ErrorCategory::Configuration,
            Error::Json(_) | Error::Io(_) => ErrorCategory::Internal,
        }
    }

    pub fn is_validation_error(&self) -> bool {
        self.category() == ErrorCategory::Validation
    }

    pub fn is_ingestion_error(&self) -> bool {
        self.category() == ErrorCategory::Ingestion
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::InvalidValue { key, message } => {
                Error::Config(format!("Invalid value for {}: {}", key, message))
            }
        }
    }
}

impl From<rules::RulesError> for Error {
    fn from(err: rules::RulesError) -> Self {
        match err {
            rules::RulesError::Io(e) => Error::Io(e),
            _ => Error::Config(err.to_string()),
        }
    }
}

impl From<providers::ProviderError> for Error {
    fn from(err: providers::ProviderError) -> Self {
        match err {
            providers::ProviderError::Io(e) => Error::Io(e),
            providers::ProviderError::Json(e) => Error::Json(e),
            _ => Error::Provider(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_display() {
        let err = Error::PatternTooLong {
            length: 201,
            max: 200,
        };
        assert_eq!(err.to_string(), "Pattern too long: 201 characters (max 200)");

        let err = Error::InvalidPattern {
            pattern: "[a".into(),
            message: "unclosed class".into(),
        };
        assert!(err.to_string().contains("'[a'"));
    }

    #[test]
    fn test_error_categories() {
        assert!(
            Error::PatternTooLong {
                length: 300,
                max: 200
            }
            .is_validation_error()
        );
        assert!(Error::Provider("down".into()).is_ingestion_error());
        assert!(Error::Config("bad".into()).is_configuration_error());
        assert_eq!(
            Error::Io(std::io::Error::other("disk")).category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn test_rules_error_conversion() {
        let err: Error = rules::RulesError::UnsupportedFormat {
            path: "rules.toml".into(),
        }
        .into();
        assert!(matches!(err, Error::Config(_)));

        let err: Error = rules::RulesError::Io(std::io::Error::other("gone")).into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_provider_error_conversion() {
        let err: Error = providers::ProviderError::Timeout {
            id: "gh".into(),
            timeout: Duration::from_secs(2),
        }
        .into();
        assert!(err.is_ingestion_error());
        assert!(err.to_string().contains("gh"));
    }
}
