//! Normalizes raw provider descriptors into catalog entries.

use std::collections::HashSet;
use std::sync::Arc;

use super::Catalog;
use crate::rules::ClassificationRules;
use crate::text;
use crate::types::{RawToolDescriptor, ToolEntry, ToolSource, make_tool_id};

/// Descriptors collected from one provider id.
#[derive(Debug, Clone)]
pub struct ProviderBatch {
    pub source: ToolSource,
    pub server: String,
    pub descriptors: Vec<RawToolDescriptor>,
}

impl ProviderBatch {
    pub fn new(
        source: ToolSource,
        server: impl Into<String>,
        descriptors: Vec<RawToolDescriptor>,
    ) -> Self {
        Self {
            source,
            server: server.into(),
            descriptors,
        }
    }
}

pub struct CatalogBuilder {
    rules: Arc<ClassificationRules>,
    entries: Vec<ToolEntry>,
    seen: HashSet<String>,
}

impl CatalogBuilder {
    pub fn new(rules: Arc<ClassificationRules>) -> Self {
        Self {
            rules,
            entries: Vec::new(),
            seen: HashSet::new(),
        }
    }

    pub fn batches(mut self, batches: impl IntoIterator<Item = ProviderBatch>) -> Self {
        for batch in batches {
            self.add_batch(&batch);
        }
        self
    }

    pub fn add_batch(&mut self, batch: &ProviderBatch) -> usize {
        batch
            .descriptors
            .iter()
            .filter(|descriptor| self.add(batch.source, &batch.server, descriptor))
            .count()
    }

    /// Append one descriptor. Returns `false` when its id is already taken.
    pub fn add(&mut self, source: ToolSource, server: &str, descriptor: &RawToolDescriptor) -> bool {
        let entry = self.normalize(source, server, descriptor);
        if !self.seen.insert(entry.id.clone()) {
            tracing::warn!(id = %entry.id, "Skipping duplicate tool id");
            return false;
        }
        self.entries.push(entry);
        true
    }

    pub fn normalize(
        &self,
        source: ToolSource,
        server: &str,
        descriptor: &RawToolDescriptor,
    ) -> ToolEntry {
        let name = descriptor.name.as_str();
        let description = descriptor.description.as_str();
        let id = make_tool_id(source, server, name);

        let class = self.rules.classify(name, description);
        let priority = self.rules.priority(&id, name, server);

        ToolEntry {
            display_name: text::display_name(name),
            source,
            server: server.to_string(),
            category: class.category,
            subcategory: class.subcategory,
            description: description.to_string(),
            keywords: text::extract_keywords(name, description),
            aliases: text::generate_aliases(name, description),
            priority,
            defer_loading: priority.is_deferred(),
            input_schema: descriptor.input_schema.clone(),
            name: name.to_string(),
            id,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self) -> Catalog {
        Catalog::new(self.entries)
    }
}
