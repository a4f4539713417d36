//! File-based catalog persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Catalog, CatalogIndexes};
use crate::types::ToolEntry;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedCatalog {
    version: String,
    generated_at: DateTime<Utc>,
    tools: Vec<ToolEntry>,
    #[serde(default)]
    by_id: BTreeMap<String, ToolEntry>,
    #[serde(flatten)]
    indexes: CatalogIndexes,
}

impl From<&Catalog> for PersistedCatalog {
    fn from(catalog: &Catalog) -> Self {
        Self {
            version: catalog.version().to_string(),
            generated_at: catalog.generated_at(),
            tools: catalog.tools().to_vec(),
            by_id: catalog
                .tools()
                .iter()
                .map(|tool| (tool.id.clone(), tool.clone()))
                .collect(),
            indexes: catalog.indexes().clone(),
        }
    }
}

/// Reads and writes a catalog as a single JSON document.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn to_json(catalog: &Catalog) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(&PersistedCatalog::from(
            catalog,
        ))?)
    }

    /// `tools` is authoritative for entries; persisted indexes are kept as-is.
    pub fn from_json(content: &str) -> crate::Result<Catalog> {
        let persisted: PersistedCatalog = serde_json::from_str(content)?;
        Ok(Catalog::from_parts(
            persisted.version,
            persisted.generated_at,
            persisted.tools,
            persisted.indexes,
        ))
    }

    pub async fn save(&self, catalog: &Catalog) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = Self::to_json(catalog)?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }

    /// Returns `None` when no catalog has been written yet.
    pub async fn load(&self) -> crate::Result<Option<Catalog>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        Self::from_json(&content).map(Some)
    }
}
