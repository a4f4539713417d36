//! Ordered category rules and priority tiers.
//!
//! Rules are evaluated in their configured order and the first rule that
//! matches a tool wins, even when a later rule would be a closer fit.
//!
//! ```rust
//! use tool_catalog::rules::{ClassificationRules, RuleSpec, RulesConfig};
//!
//! let config = RulesConfig::default()
//!     .rule(RuleSpec::new("version_control").subcategory("github").patterns(["github_*"]))
//!     .always_loaded(["search_tools"]);
//! let rules = ClassificationRules::from_config(&config).unwrap();
//!
//! let class = rules.classify("github_create_issue", "Create a new issue");
//! assert_eq!(class.category, "version_control");
//! ```

mod builtin;
mod config;

pub use builtin::builtin_rules;
pub use config::{RuleSpec, RulesConfig};

use std::collections::HashSet;
use std::path::PathBuf;

use regex::{Regex, RegexBuilder};

use crate::types::Priority;

pub const DEFAULT_CATEGORY: &str = "other";

#[derive(Debug, thiserror::Error)]
pub enum RulesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_bw::Error),

    #[error("Unsupported rules file format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Invalid pattern '{pattern}' in rule '{category}': {message}")]
    InvalidPattern {
        category: String,
        pattern: String,
        message: String,
    },
}

/// Convert a shell-style wildcard (`github_*`, `read_?ile`) into an
/// anchored, case-insensitive regex.
pub fn wildcard_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');
    RegexBuilder::new(&expr).case_insensitive(true).build()
}

#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: String,
    pub subcategory: Option<String>,
    patterns: Vec<Regex>,
    keywords: Vec<String>,
}

impl CategoryRule {
    pub fn compile(spec: &RuleSpec) -> Result<Self, RulesError> {
        let patterns = spec
            .patterns
            .iter()
            .map(|p| {
                wildcard_to_regex(p).map_err(|e| RulesError::InvalidPattern {
                    category: spec.category.clone(),
                    pattern: p.clone(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            category: spec.category.clone(),
            subcategory: spec.subcategory.clone(),
            patterns,
            keywords: spec.keywords.iter().map(|k| k.to_lowercase()).collect(),
        })
    }

    /// Name patterns first, then keywords as substrings of the lowercased
    /// `name + " " + description`.
    pub fn matches(&self, name: &str, haystack_lower: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(name))
            || self
                .keywords
                .iter()
                .any(|k| !k.is_empty() && haystack_lower.contains(k.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: String,
    pub subcategory: Option<String>,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            subcategory: None,
        }
    }
}

/// Compiled classification rules, loaded once and shared by every build.
#[derive(Debug, Clone, Default)]
pub struct ClassificationRules {
    rules: Vec<CategoryRule>,
    always_loaded: HashSet<String>,
    high_priority_servers: HashSet<String>,
    low_priority_servers: HashSet<String>,
}

impl ClassificationRules {
    pub fn from_config(config: &RulesConfig) -> Result<Self, RulesError> {
        let rules = config
            .rules
            .iter()
            .map(CategoryRule::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules,
            always_loaded: config.always_loaded.iter().cloned().collect(),
            high_priority_servers: config.high_priority_servers.iter().cloned().collect(),
            low_priority_servers: config.low_priority_servers.iter().cloned().collect(),
        })
    }

    /// The bundled default rule set.
    pub fn builtin() -> Self {
        match Self::from_config(&builtin_rules()) {
            Ok(rules) => rules,
            Err(e) => {
                tracing::warn!(error = %e, "Builtin classification rules failed to compile");
                Self::default()
            }
        }
    }

    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self, RulesError> {
        let config = RulesConfig::from_file(path).await?;
        Self::from_config(&config)
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First matching rule wins; no match falls back to `"other"`.
    pub fn classify(&self, name: &str, description: &str) -> Classification {
        let haystack = format!("{name} {description}").to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(name, &haystack))
            .map(|rule| Classification {
                category: rule.category.clone(),
                subcategory: rule.subcategory.clone(),
            })
            .unwrap_or_default()
    }

    pub fn priority(&self, id: &str, name: &str, server: &str) -> Priority {
        if self.is_always_loaded(id, name) {
            Priority::Always
        } else if self.high_priority_servers.contains(server) {
            Priority::High
        } else if self.low_priority_servers.contains(server) {
            Priority::Low
        } else {
            Priority::Medium
        }
    }

    /// The always-loaded set is keyed by tool name or full id.
    pub fn is_always_loaded(&self, id: &str, name: &str) -> bool {
        self.always_loaded.contains(name) || self.always_loaded.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(config: RulesConfig) -> ClassificationRules {
        ClassificationRules::from_config(&config).unwrap()
    }

    #[test]
    fn test_wildcard_to_regex() {
        let re = wildcard_to_regex("github_*").unwrap();
        assert!(re.is_match("github_create_issue"));
        assert!(re.is_match("GITHUB_list"));
        assert!(!re.is_match("my_github_tool"));

        let re = wildcard_to_regex("read_?ile").unwrap();
        assert!(re.is_match("read_file"));
        assert!(!re.is_match("read_profile"));

        let re = wildcard_to_regex("a.b").unwrap();
        assert!(re.is_match("a.b"));
        assert!(!re.is_match("axb"));
    }

    #[test]
    fn test_first_match_wins() {
        let rules = rules(
            RulesConfig::default()
                .rule(RuleSpec::new("broad").patterns(["github_*"]))
                .rule(
                    RuleSpec::new("specific")
                        .subcategory("issues")
                        .patterns(["github_*_issue"])
                        .keywords(["issue"]),
                ),
        );

        let class = rules.classify("github_create_issue", "Create a new issue");
        assert_eq!(class.category, "broad");
        assert_eq!(class.subcategory, None);
    }

    #[test]
    fn test_rule_order_is_significant() {
        let specific = RuleSpec::new("specific").patterns(["github_*_issue"]);
        let broad = RuleSpec::new("broad").patterns(["github_*"]);

        let specific_first = rules(
            RulesConfig::default()
                .rule(specific.clone())
                .rule(broad.clone()),
        );
        let broad_first = rules(RulesConfig::default().rule(broad).rule(specific));

        assert_eq!(
            specific_first.classify("github_create_issue", "").category,
            "specific"
        );
        assert_eq!(
            broad_first.classify("github_create_issue", "").category,
            "broad"
        );
    }

    #[test]
    fn test_keyword_fallback() {
        let rules = rules(
            RulesConfig::default().rule(
                RuleSpec::new("database")
                    .subcategory("sql")
                    .patterns(["db_*"])
                    .keywords(["SQL"]),
            ),
        );

        let class = rules.classify("run_query", "Execute a sql statement");
        assert_eq!(class.category, "database");
        assert_eq!(class.subcategory.as_deref(), Some("sql"));
    }

    #[test]
    fn test_no_match_is_other() {
        let rules = rules(RulesConfig::default().rule(RuleSpec::new("web").keywords(["http"])));
        assert_eq!(rules.classify("ping", "Ping a host"), Classification::default());
        assert_eq!(Classification::default().category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_priority_tiers() {
        let rules = rules(
            RulesConfig::default()
                .always_loaded(["search_tools"])
                .high_priority_servers(["github"])
                .low_priority_servers(["legacy"]),
        );

        assert_eq!(
            rules.priority("mcp:legacy:search_tools", "search_tools", "legacy"),
            Priority::Always
        );
        assert_eq!(
            rules.priority("mcp:github:list", "list", "github"),
            Priority::High
        );
        assert_eq!(
            rules.priority("mcp:legacy:list", "list", "legacy"),
            Priority::Low
        );
        assert_eq!(
            rules.priority("mcp:other:list", "list", "other"),
            Priority::Medium
        );
    }

    #[test]
    fn test_always_loaded_by_id() {
        let rules = rules(RulesConfig::default().always_loaded(["mcp:fs:read_file"]));
        assert_eq!(
            rules.priority("mcp:fs:read_file", "read_file", "fs"),
            Priority::Always
        );
        assert_eq!(
            rules.priority("mcp:other:read_file", "read_file", "other"),
            Priority::Medium
        );
        assert!(rules.is_always_loaded("mcp:fs:read_file", "read_file"));
        assert!(!rules.is_always_loaded("mcp:other:read_file", "read_file"));
    }

    #[test]
    fn test_always_loaded_agrees_with_priority() {
        let rules = rules(
            RulesConfig::default()
                .always_loaded(["search_tools", "rust:coord:orchestrate_agents"])
                .high_priority_servers(["coord"]),
        );
        let tools = [
            ("mcp:core:search_tools", "search_tools", "core"),
            ("rust:coord:orchestrate_agents", "orchestrate_agents", "coord"),
            ("rust:coord:spawn_agent", "spawn_agent", "coord"),
        ];

        for (id, name, server) in tools {
            assert_eq!(
                rules.is_always_loaded(id, name),
                rules.priority(id, name, server) == Priority::Always,
                "{id}"
            );
        }
    }

    #[test]
    fn test_builtin_compiles() {
        let rules = ClassificationRules::builtin();
        assert_eq!(rules.len(), builtin_rules().rules.len());
        assert!(!rules.is_empty());
    }
}
