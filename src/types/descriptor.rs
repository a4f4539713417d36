//! Raw tool descriptors as reported by providers.

use serde::{Deserialize, Serialize};

use super::ToolSource;

const ID_SEPARATOR: char = ':';

/// A tool as a provider lists it, before normalization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub input_schema: serde_json::Value,
}

impl RawToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: serde_json::json!({"type": "object"}),
        }
    }

    pub fn input_schema(mut self, schema: serde_json::Value) -> Self {
        self.input_schema = schema;
        self
    }
}

/// Create a tool id (`source:server:name`).
pub fn make_tool_id(source: ToolSource, server: &str, name: &str) -> String {
    format!(
        "{}{ID_SEPARATOR}{server}{ID_SEPARATOR}{name}",
        source.id_prefix()
    )
}

/// Split a tool id into (source prefix, server, name).
pub fn parse_tool_id(id: &str) -> Option<(&str, &str, &str)> {
    let mut parts = id.splitn(3, ID_SEPARATOR);
    let source = parts.next()?;
    let server = parts.next()?;
    let name = parts.next()?;
    Some((source, server, name))
}
