//! Tool provider boundary.
//!
//! A provider lists raw descriptors for each of its provider ids (an MCP
//! server, a crate, a subagent pack). Collection isolates every id: one
//! that fails or times out is logged and skipped while the rest are kept.

mod file;
mod memory;

pub use file::FileProvider;
pub use memory::StaticProvider;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;

use crate::catalog::ProviderBatch;
use crate::types::{RawToolDescriptor, ToolSource};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Provider not found: {id}")]
    NotFound { id: String },

    #[error("Provider {id} unreachable: {message}")]
    Unreachable { id: String, message: String },

    #[error("Provider {id} timed out after {:.1}s", timeout.as_secs_f64())]
    Timeout { id: String, timeout: Duration },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    fn source(&self) -> ToolSource;

    /// Ids this provider can list, in a stable order.
    fn provider_ids(&self) -> Vec<String>;

    async fn list_tools(&self, provider_id: &str) -> Result<Vec<RawToolDescriptor>, ProviderError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedProvider {
    pub source: ToolSource,
    pub provider_id: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct Collection {
    pub batches: Vec<ProviderBatch>,
    pub failed: Vec<FailedProvider>,
}

impl Collection {
    pub fn descriptor_count(&self) -> usize {
        self.batches.iter().map(|b| b.descriptors.len()).sum()
    }
}

#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn ToolProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, provider: impl ToolProvider + 'static) {
        self.providers.push(Arc::new(provider));
    }

    pub fn with(mut self, provider: impl ToolProvider + 'static) -> Self {
        self.register(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Query every provider id concurrently. Batches come back in
    /// registration order regardless of completion order.
    pub async fn collect(&self, timeout: Duration) -> Collection {
        let jobs: Vec<(Arc<dyn ToolProvider>, String)> = self
            .providers
            .iter()
            .flat_map(|provider| {
                provider
                    .provider_ids()
                    .into_iter()
                    .map(move |id| (Arc::clone(provider), id))
            })
            .collect();

        let outcomes = join_all(jobs.into_iter().map(|(provider, id)| async move {
            let result = match tokio::time::timeout(timeout, provider.list_tools(&id)).await {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout {
                    id: id.clone(),
                    timeout,
                }),
            };
            (provider, id, result)
        }))
        .await;

        let mut collection = Collection::default();
        for (provider, id, result) in outcomes {
            match result {
                Ok(descriptors) => {
                    tracing::debug!(
                        provider = provider.name(),
                        provider_id = %id,
                        tools = descriptors.len(),
                        "Collected tool descriptors"
                    );
                    collection
                        .batches
                        .push(ProviderBatch::new(provider.source(), id, descriptors));
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        provider_id = %id,
                        error = %e,
                        "Skipping unavailable tool provider"
                    );
                    collection.failed.push(FailedProvider {
                        source: provider.source(),
                        provider_id: id,
                        error: e.to_string(),
                    });
                }
            }
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;

    #[async_trait]
    impl ToolProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn source(&self) -> ToolSource {
            ToolSource::Mcp
        }

        fn provider_ids(&self) -> Vec<String> {
            vec!["down".to_string()]
        }

        async fn list_tools(&self, provider_id: &str) -> Result<Vec<RawToolDescriptor>, ProviderError> {
            Err(ProviderError::Unreachable {
                id: provider_id.to_string(),
                message: "connection refused".to_string(),
            })
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl ToolProvider for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        fn source(&self) -> ToolSource {
            ToolSource::Subagent
        }

        fn provider_ids(&self) -> Vec<String> {
            vec!["sleepy".to_string()]
        }

        async fn list_tools(&self, _provider_id: &str) -> Result<Vec<RawToolDescriptor>, ProviderError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(vec![RawToolDescriptor::new("late", "Arrives too late")])
        }
    }

    #[tokio::test]
    async fn test_collect_skips_failures() {
        let registry = ProviderRegistry::new()
            .with(FailingProvider)
            .with(
                StaticProvider::new("static", ToolSource::Builtin)
                    .server("core", vec![RawToolDescriptor::new("ping", "Ping a host")]),
            );

        let collection = registry.collect(Duration::from_secs(1)).await;

        assert_eq!(collection.batches.len(), 1);
        assert_eq!(collection.batches[0].server, "core");
        assert_eq!(collection.batches[0].source, ToolSource::Builtin);
        assert_eq!(collection.failed.len(), 1);
        assert_eq!(collection.failed[0].provider_id, "down");
        assert!(collection.failed[0].error.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_collect_times_out_slow_provider() {
        let registry = ProviderRegistry::new().with(SlowProvider).with(
            StaticProvider::new("static", ToolSource::Mcp)
                .server("a", vec![RawToolDescriptor::new("one", "First")])
                .server("b", vec![RawToolDescriptor::new("two", "Second")]),
        );

        let collection = registry.collect(Duration::from_millis(50)).await;

        let servers: Vec<&str> = collection.batches.iter().map(|b| b.server.as_str()).collect();
        assert_eq!(servers, vec!["a", "b"]);
        assert_eq!(collection.descriptor_count(), 2);
        assert_eq!(collection.failed.len(), 1);
        assert!(collection.failed[0].error.contains("timed out"));
    }

    #[tokio::test]
    async fn test_empty_registry() {
        let collection = ProviderRegistry::new().collect(Duration::from_secs(1)).await;
        assert!(collection.batches.is_empty());
        assert!(collection.failed.is_empty());
    }
}
