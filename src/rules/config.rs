//! Serializable rules configuration (JSON or YAML).

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::RulesError;

/// One category rule as written in a rules file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl RuleSpec {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn keywords(mut self, keywords: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }
}

/// Rules file contents. `rules` is a list, not a map: order decides
/// which category a tool lands in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesConfig {
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
    #[serde(default)]
    pub always_loaded: Vec<String>,
    #[serde(default)]
    pub high_priority_servers: Vec<String>,
    #[serde(default)]
    pub low_priority_servers: Vec<String>,
}

impl RulesConfig {
    pub fn rule(mut self, rule: RuleSpec) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn always_loaded(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.always_loaded.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn high_priority_servers(
        mut self,
        servers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.high_priority_servers
            .extend(servers.into_iter().map(Into::into));
        self
    }

    pub fn low_priority_servers(
        mut self,
        servers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.low_priority_servers
            .extend(servers.into_iter().map(Into::into));
        self
    }

    pub fn from_json(content: &str) -> Result<Self, RulesError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self, RulesError> {
        Ok(serde_yaml_bw::from_str(content)?)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let content = tokio::fs::read_to_string(path).await?;
        match extension.as_deref() {
            Some("json") => Self::from_json(&content),
            Some("yaml" | "yml") => Self::from_yaml(&content),
            _ => Err(RulesError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_keeps_order() {
        let config = RulesConfig::from_json(
            r#"{
                "rules": [
                    {"category": "zeta", "patterns": ["z_*"]},
                    {"category": "alpha", "subcategory": "a", "keywords": ["alpha"]}
                ],
                "alwaysLoaded": ["search_tools"],
                "highPriorityServers": ["github"]
            }"#,
        )
        .unwrap();

        assert_eq!(config.rules[0].category, "zeta");
        assert_eq!(config.rules[1].subcategory.as_deref(), Some("a"));
        assert_eq!(config.always_loaded, vec!["search_tools"]);
        assert!(config.low_priority_servers.is_empty());
    }

    #[test]
    fn test_from_yaml() {
        let config = RulesConfig::from_yaml(
            r#"
rules:
  - category: version_control
    subcategory: github
    patterns: ["github_*"]
  - category: database
    keywords: [sql]
lowPriorityServers: [legacy]
"#,
        )
        .unwrap();

        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[0].patterns, vec!["github_*"]);
        assert_eq!(config.rules[1].keywords, vec!["sql"]);
        assert_eq!(config.low_priority_servers, vec!["legacy"]);
    }

    #[tokio::test]
    async fn test_from_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("rules.json");
        tokio::fs::write(&json_path, r#"{"rules": [{"category": "web"}]}"#)
            .await
            .unwrap();
        let config = RulesConfig::from_file(&json_path).await.unwrap();
        assert_eq!(config.rules[0].category, "web");

        let txt_path = dir.path().join("rules.txt");
        tokio::fs::write(&txt_path, "rules: []").await.unwrap();
        let err = RulesConfig::from_file(&txt_path).await.unwrap_err();
        assert!(matches!(err, RulesError::UnsupportedFormat { .. }));
    }

    #[tokio::test]
    async fn test_from_file_missing() {
        let err = RulesConfig::from_file("/nonexistent/rules.json")
            .await
            .unwrap_err();
        assert!(matches!(err, RulesError::Io(_)));
    }
}
