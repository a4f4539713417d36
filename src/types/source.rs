use serde::{Deserialize, Serialize};

/// Kind of provider a tool was collected from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolSource {
    #[default]
    Mcp,
    RustCrate,
    Subagent,
    Builtin,
}

impl ToolSource {
    pub const ALL: [ToolSource; 4] = [
        ToolSource::Mcp,
        ToolSource::RustCrate,
        ToolSource::Subagent,
        ToolSource::Builtin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mcp => "mcp",
            Self::RustCrate => "rust_crate",
            Self::Subagent => "subagent",
            Self::Builtin => "builtin",
        }
    }

    /// Leading segment of a tool id (`rust:coord:orchestrate_agents`).
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::RustCrate => "rust",
            other => other.as_str(),
        }
    }

    /// Accepts both the serialized name and the id prefix.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mcp" => Some(Self::Mcp),
            "rust_crate" | "rust" => Some(Self::RustCrate),
            "subagent" => Some(Self::Subagent),
            "builtin" => Some(Self::Builtin),
            _ => None,
        }
    }
}

impl std::fmt::Display for ToolSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loading tier of a tool. Only `Always` tools are surfaced up front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Always,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Always,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];

    pub const DEFERRED: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn is_deferred(&self) -> bool {
        !matches!(self, Self::Always)
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Some(Self::Always),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_display() {
        assert_eq!(ToolSource::Mcp.to_string(), "mcp");
        assert_eq!(ToolSource::RustCrate.to_string(), "rust_crate");
        assert_eq!(ToolSource::Subagent.to_string(), "subagent");
        assert_eq!(ToolSource::Builtin.to_string(), "builtin");
    }

    #[test]
    fn test_source_id_prefix() {
        assert_eq!(ToolSource::RustCrate.id_prefix(), "rust");
        assert_eq!(ToolSource::Mcp.id_prefix(), "mcp");
    }

    #[test]
    fn test_source_from_name() {
        assert_eq!(ToolSource::from_name("rust"), Some(ToolSource::RustCrate));
        assert_eq!(
            ToolSource::from_name("rust_crate"),
            Some(ToolSource::RustCrate)
        );
        assert_eq!(ToolSource::from_name("MCP"), Some(ToolSource::Mcp));
        assert_eq!(ToolSource::from_name("plugin"), None);
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&ToolSource::RustCrate).unwrap();
        assert_eq!(json, "\"rust_crate\"");

        let parsed: Priority = serde_json::from_str("\"always\"").unwrap();
        assert_eq!(parsed, Priority::Always);
    }

    #[test]
    fn test_priority_deferred() {
        assert!(!Priority::Always.is_deferred());
        for priority in Priority::DEFERRED {
            assert!(priority.is_deferred());
        }
    }
}
