//! Public discovery facade.
//!
//! [`ToolDiscovery`] owns the current [`SearchEngine`] behind a single
//! swappable handle. Readers take one `Arc` snapshot per call, and a
//! rebuild installs a fully built replacement with one assignment, so no
//! caller ever sees a partially rebuilt catalog.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::catalog::{Catalog, CatalogBuilder, CatalogStore};
use crate::config::DiscoveryConfig;
use crate::providers::ProviderRegistry;
use crate::rules::ClassificationRules;
use crate::search::{SearchEngine, SearchHit, SearchOptions};
use crate::types::{ToolEntry, ToolSource};
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_tools: usize,
    pub by_source: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
    pub always_loaded_count: usize,
    pub deferred_count: usize,
}

impl CatalogStats {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut stats = Self {
            total_tools: catalog.len(),
            ..Self::default()
        };
        for entry in catalog.tools() {
            *stats.by_source.entry(entry.source.to_string()).or_default() += 1;
            *stats.by_priority.entry(entry.priority.to_string()).or_default() += 1;
            *stats.by_category.entry(entry.category.clone()).or_default() += 1;
            if entry.is_always_loaded() {
                stats.always_loaded_count += 1;
            }
            if entry.is_deferred() {
                stats.deferred_count += 1;
            }
        }
        stats
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebuildStatus {
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildSummary {
    pub status: RebuildStatus,
    pub total_tools: usize,
    /// `source:id` of every provider skipped during collection.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_providers: Vec<String>,
    pub persisted: bool,
}

pub struct ToolDiscovery {
    config: DiscoveryConfig,
    rules: Arc<ClassificationRules>,
    providers: ProviderRegistry,
    store: Option<CatalogStore>,
    engine: RwLock<Arc<SearchEngine>>,
    // Held for a whole rebuild so the persisted file and the installed
    // engine always come from the same pass.
    rebuild: Mutex<()>,
}

impl ToolDiscovery {
    /// Start from an empty catalog; call [`rebuild_catalog`](Self::rebuild_catalog)
    /// to populate it.
    pub fn new(
        config: DiscoveryConfig,
        rules: ClassificationRules,
        providers: ProviderRegistry,
    ) -> Self {
        let store = config.catalog_path.clone().map(CatalogStore::new);
        Self {
            config,
            rules: Arc::new(rules),
            providers,
            store,
            engine: RwLock::new(Arc::new(SearchEngine::new(Arc::new(Catalog::empty())))),
            rebuild: Mutex::new(()),
        }
    }

    /// Load rules (from `rules_path`, else builtin) and the persisted
    /// catalog when one exists.
    pub async fn load(config: DiscoveryConfig, providers: ProviderRegistry) -> Result<Self> {
        let rules = match &config.rules_path {
            Some(path) => ClassificationRules::load(path).await?,
            None => ClassificationRules::builtin(),
        };

        let discovery = Self::new(config, rules, providers);
        if let Some(store) = &discovery.store {
            if let Some(catalog) = store.load().await? {
                tracing::info!(
                    path = %store.path().display(),
                    tools = catalog.len(),
                    "Loaded persisted tool catalog"
                );
                discovery.install(catalog);
            }
        }
        Ok(discovery)
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    pub fn rules(&self) -> &ClassificationRules {
        &self.rules
    }

    /// Snapshot of the active engine. Hold it for one logical operation only.
    pub fn engine(&self) -> Arc<SearchEngine> {
        Arc::clone(&self.engine.read().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(self.engine().catalog())
    }

    fn install(&self, catalog: Catalog) {
        let engine = Arc::new(SearchEngine::new(Arc::new(catalog)));
        *self.engine.write().unwrap_or_else(|e| e.into_inner()) = engine;
    }

    pub fn search(&self, query: &str, mut options: SearchOptions) -> Result<Vec<SearchHit>> {
        options.limit = Some(options.effective_limit(self.config.default_limit));
        self.engine().search(query, &options)
    }

    pub fn get_stats(&self) -> CatalogStats {
        CatalogStats::from_catalog(&self.catalog())
    }

    pub fn get_tool(&self, id: &str) -> Option<ToolEntry> {
        self.catalog().get(id).cloned()
    }

    pub fn get_by_category(&self, category: &str) -> Vec<ToolEntry> {
        owned(self.catalog().by_category(category))
    }

    pub fn get_by_server(&self, server: &str) -> Vec<ToolEntry> {
        owned(self.catalog().by_server(server))
    }

    /// Unknown source names yield an empty list.
    pub fn get_by_source(&self, source: &str) -> Vec<ToolEntry> {
        match ToolSource::from_name(source) {
            Some(source) => owned(self.catalog().by_source(source)),
            None => Vec::new(),
        }
    }

    pub fn get_always_loaded_tools(&self) -> Vec<ToolEntry> {
        owned(self.catalog().always_loaded())
    }

    pub fn get_deferred_tools(&self) -> Vec<ToolEntry> {
        owned(self.catalog().deferred())
    }

    pub fn suggest(&self, partial: &str, limit: usize) -> Vec<String> {
        self.engine().suggest(partial, limit)
    }

    /// Re-ingest every provider, rebuild the indexes and swap the active
    /// engine. Failing providers and persistence errors are logged, not
    /// returned. Concurrent calls run one after another.
    pub async fn rebuild_catalog(&self) -> Result<RebuildSummary> {
        let _guard = self.rebuild.lock().await;
        let collection = self.providers.collect(self.config.provider_timeout).await;
        let failed_providers: Vec<String> = collection
            .failed
            .iter()
            .map(|f| format!("{}:{}", f.source, f.provider_id))
            .collect();

        let catalog = CatalogBuilder::new(Arc::clone(&self.rules))
            .batches(collection.batches)
            .build();
        let total_tools = catalog.len();

        let persisted = match &self.store {
            Some(store) => match store.save(&catalog).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(
                        path = %store.path().display(),
                        error = %e,
                        "Failed to persist tool catalog"
                    );
                    false
                }
            },
            None => false,
        };

        self.install(catalog);

        tracing::info!(
            total_tools,
            failed = failed_providers.len(),
            persisted,
            "Rebuilt tool catalog"
        );

        Ok(RebuildSummary {
            status: RebuildStatus::Success,
            total_tools,
            failed_providers,
            persisted,
        })
    }
}

impl std::fmt::Debug for ToolDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDiscovery")
            .field("config", &self.config)
            .field("rules", &self.rules.len())
            .field("providers", &self.providers.len())
            .field("tools", &self.engine().catalog().len())
            .finish()
    }
}

fn owned(entries: Vec<&ToolEntry>) -> Vec<ToolEntry> {
    entries.into_iter().cloned().collect()
}
