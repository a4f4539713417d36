//! File-based provider: one JSON descriptor file per provider id.
//!
//! Each `<dir>/<id>.json` holds either a bare array of descriptors or an
//! object with a `tools` array (the shape of an MCP `tools/list` result).

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use super::{ProviderError, ToolProvider};
use crate::types::{RawToolDescriptor, ToolSource};

#[derive(Deserialize)]
#[serde(untagged)]
enum DescriptorFile {
    List(Vec<RawToolDescriptor>),
    Listing { tools: Vec<RawToolDescriptor> },
}

impl From<DescriptorFile> for Vec<RawToolDescriptor> {
    fn from(file: DescriptorFile) -> Self {
        match file {
            DescriptorFile::List(tools) | DescriptorFile::Listing { tools } => tools,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileProvider {
    name: String,
    source: ToolSource,
    dir: PathBuf,
    ids: Vec<String>,
}

impl FileProvider {
    pub fn new(name: impl Into<String>, source: ToolSource, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source,
            dir: dir.into(),
            ids: Vec::new(),
        }
    }

    pub fn ids(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    fn file_for(&self, provider_id: &str) -> PathBuf {
        self.dir.join(format!("{provider_id}.json"))
    }
}

#[async_trait]
impl ToolProvider for FileProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> ToolSource {
        self.source
    }

    fn provider_ids(&self) -> Vec<String> {
        self.ids.clone()
    }

    async fn list_tools(&self, provider_id: &str) -> Result<Vec<RawToolDescriptor>, ProviderError> {
        if !self.ids.iter().any(|id| id == provider_id) {
            return Err(ProviderError::NotFound {
                id: provider_id.to_string(),
            });
        }

        let content = tokio::fs::read_to_string(self.file_for(provider_id)).await?;
        let file: DescriptorFile = serde_json::from_str(&content)?;
        Ok(file.into())
    }
}
