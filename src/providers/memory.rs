//! In-memory provider backed by static per-server descriptor lists.

use async_trait::async_trait;

use super::{ProviderError, ToolProvider};
use crate::types::{RawToolDescriptor, ToolSource};

#[derive(Debug, Clone)]
pub struct StaticProvider {
    name: String,
    source: ToolSource,
    servers: Vec<(String, Vec<RawToolDescriptor>)>,
}

impl StaticProvider {
    pub fn new(name: impl Into<String>, source: ToolSource) -> Self {
        Self {
            name: name.into(),
            source,
            servers: Vec::new(),
        }
    }

    /// Add (or replace) the descriptor list of one server.
    pub fn server(mut self, id: impl Into<String>, tools: Vec<RawToolDescriptor>) -> Self {
        let id = id.into();
        match self.servers.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, existing)) => *existing = tools,
            None => self.servers.push((id, tools)),
        }
        self
    }
}

#[async_trait]
impl ToolProvider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn source(&self) -> ToolSource {
        self.source
    }

    fn provider_ids(&self) -> Vec<String> {
        self.servers.iter().map(|(id, _)| id.clone()).collect()
    }

    async fn list_tools(&self, provider_id: &str) -> Result<Vec<RawToolDescriptor>, ProviderError> {
        self.servers
            .iter()
            .find(|(id, _)| id == provider_id)
            .map(|(_, tools)| tools.clone())
            .ok_or_else(|| ProviderError::NotFound {
                id: provider_id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticProvider::new("builtin", ToolSource::Builtin)
            .server("core", vec![RawToolDescriptor::new("ping", "Ping a host")])
            .server("extra", vec![]);

        assert_eq!(provider.provider_ids(), vec!["core", "extra"]);
        assert_eq!(provider.list_tools("core").await.unwrap().len(), 1);
        assert!(provider.list_tools("extra").await.unwrap().is_empty());
        assert!(matches!(
            provider.list_tools("missing").await,
            Err(ProviderError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_server_replaces_existing() {
        let provider = StaticProvider::new("builtin", ToolSource::Builtin)
            .server("core", vec![RawToolDescriptor::new("ping", "Ping a host")])
            .server("core", vec![]);

        assert_eq!(provider.provider_ids(), vec!["core"]);
        assert!(provider.list_tools("core").await.unwrap().is_empty());
    }
}
