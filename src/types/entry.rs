//! Normalized catalog entry.

use serde::{Deserialize, Serialize};

use super::{Priority, ToolSource};

/// One discoverable tool in the catalog's uniform schema.
///
/// Entries are created by [`CatalogBuilder`](crate::catalog::CatalogBuilder)
/// and never change afterwards; `id` is fixed at creation and
/// `defer_loading` always equals `priority != Always`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolEntry {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub source: ToolSource,
    pub server: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub priority: Priority,
    pub defer_loading: bool,
    #[serde(default)]
    pub input_schema: serde_json::Value,
}

impl ToolEntry {
    pub fn is_always_loaded(&self) -> bool {
        self.priority == Priority::Always
    }

    pub fn is_deferred(&self) -> bool {
        self.defer_loading
    }
}
