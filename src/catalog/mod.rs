//! Immutable tool catalog with lookup indexes.

mod builder;
mod store;

pub use builder::{CatalogBuilder, ProviderBatch};
pub use store::CatalogStore;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Priority, ToolEntry, ToolSource};

pub const CATALOG_VERSION: &str = "1.0.0";

/// Derived id lists keyed by category, source, priority and server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogIndexes {
    #[serde(default)]
    pub by_category: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub by_source: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub by_priority: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub by_server: BTreeMap<String, Vec<String>>,
}

impl CatalogIndexes {
    /// Single pass over the entries, appending each id to its buckets.
    pub fn build(tools: &[ToolEntry]) -> Self {
        let mut indexes = Self::default();
        for tool in tools {
            push(&mut indexes.by_category, &tool.category, &tool.id);
            push(&mut indexes.by_source, tool.source.as_str(), &tool.id);
            push(&mut indexes.by_priority, tool.priority.as_str(), &tool.id);
            push(&mut indexes.by_server, &tool.server, &tool.id);
        }
        indexes
    }
}

fn push(index: &mut BTreeMap<String, Vec<String>>, key: &str, id: &str) {
    index.entry(key.to_string()).or_default().push(id.to_string());
}

/// A complete build of the tool universe. Never mutated after creation;
/// a rebuild produces a new `Catalog`.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: String,
    generated_at: DateTime<Utc>,
    tools: Vec<ToolEntry>,
    by_id: HashMap<String, usize>,
    indexes: CatalogIndexes,
}

impl Catalog {
    pub fn new(tools: Vec<ToolEntry>) -> Self {
        let indexes = CatalogIndexes::build(&tools);
        Self::from_parts(CATALOG_VERSION, Utc::now(), tools, indexes)
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Assemble a catalog from previously persisted parts. The indexes are
    /// taken as given; ids they reference but `tools` lacks are skipped on
    /// lookup.
    pub fn from_parts(
        version: impl Into<String>,
        generated_at: DateTime<Utc>,
        tools: Vec<ToolEntry>,
        indexes: CatalogIndexes,
    ) -> Self {
        let by_id = tools
            .iter()
            .enumerate()
            .map(|(position, tool)| (tool.id.clone(), position))
            .collect();

        Self {
            version: version.into(),
            generated_at,
            tools,
            by_id,
            indexes,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn tools(&self) -> &[ToolEntry] {
        &self.tools
    }

    pub fn indexes(&self) -> &CatalogIndexes {
        &self.indexes
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ToolEntry> {
        self.position(id).map(|position| &self.tools[position])
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn by_category(&self, category: &str) -> Vec<&ToolEntry> {
        self.resolve(self.indexes.by_category.get(category))
    }

    pub fn by_source(&self, source: ToolSource) -> Vec<&ToolEntry> {
        self.resolve(self.indexes.by_source.get(source.as_str()))
    }

    pub fn by_priority(&self, priority: Priority) -> Vec<&ToolEntry> {
        self.resolve(self.indexes.by_priority.get(priority.as_str()))
    }

    pub fn by_server(&self, server: &str) -> Vec<&ToolEntry> {
        self.resolve(self.indexes.by_server.get(server))
    }

    pub fn always_loaded(&self) -> Vec<&ToolEntry> {
        self.by_priority(Priority::Always)
    }

    /// Deferred tools, grouped by tier (high, medium, low).
    pub fn deferred(&self) -> Vec<&ToolEntry> {
        Priority::DEFERRED
            .iter()
            .flat_map(|priority| self.by_priority(*priority))
            .collect()
    }

    fn resolve(&self, ids: Option<&Vec<String>>) -> Vec<&ToolEntry> {
        ids.map(|ids| ids.iter().filter_map(|id| self.get(id)).collect())
            .unwrap_or_default()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
    }
}
