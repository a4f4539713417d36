//! Default classification rules used when no rules file is configured.

use super::{RuleSpec, RulesConfig};

/// Ordered default rules. More specific families come before the broad
/// ones that would otherwise swallow them (`github` before `git`).
pub fn builtin_rules() -> RulesConfig {
    RulesConfig::default()
        .rule(
            RuleSpec::new("version_control")
                .subcategory("github")
                .patterns(["github_*", "gh_*"])
                .keywords(["github", "pull request"]),
        )
        .rule(
            RuleSpec::new("version_control")
                .subcategory("git")
                .patterns(["git_*"])
                .keywords(["git ", "commit", "branch"]),
        )
        .rule(
            RuleSpec::new("browser")
                .subcategory("automation")
                .patterns(["browser_*", "puppeteer_*", "playwright_*"])
                .keywords(["browser", "screenshot", "navigate"]),
        )
        .rule(
            RuleSpec::new("web")
                .subcategory("fetch")
                .patterns(["fetch*", "http_*", "web_*"])
                .keywords(["http", "url", "web page"]),
        )
        .rule(
            RuleSpec::new("database")
                .subcategory("sql")
                .patterns(["*sql*", "db_*"])
                .keywords(["database", "sql", "table"]),
        )
        .rule(
            RuleSpec::new("filesystem")
                .subcategory("files")
                .patterns(["*_file", "*_file_*", "*_files", "fs_*", "*directory*"])
                .keywords(["file", "directory", "path"]),
        )
        .rule(
            RuleSpec::new("memory")
                .subcategory("knowledge")
                .patterns(["memory_*", "*_memory", "*_entities"])
                .keywords(["memory", "knowledge graph", "remember"]),
        )
        .rule(
            RuleSpec::new("coordination")
                .subcategory("agents")
                .patterns(["*agent*", "orchestrate_*", "swarm_*", "task_*"])
                .keywords(["agent", "orchestrat", "coordinate", "delegate"]),
        )
        .rule(
            RuleSpec::new("search")
                .subcategory("code")
                .patterns(["search_*", "grep*", "find_*"])
                .keywords(["search", "grep", "lookup"]),
        )
        .rule(
            RuleSpec::new("testing")
                .patterns(["test_*", "*_test", "*_tests"])
                .keywords(["test", "benchmark", "coverage"]),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::ClassificationRules;

    #[test]
    fn test_builtin_classification() {
        let rules = ClassificationRules::from_config(&builtin_rules()).unwrap();

        let class = rules.classify("github_create_issue", "Create a new issue");
        assert_eq!(class.category, "version_control");
        assert_eq!(class.subcategory.as_deref(), Some("github"));

        let class = rules.classify("git_status", "Show the working tree status");
        assert_eq!(class.subcategory.as_deref(), Some("git"));

        let class = rules.classify("orchestrate_agents", "Coordinate multiple agents");
        assert_eq!(class.category, "coordination");

        let class = rules.classify("read_file", "Read a file from disk");
        assert_eq!(class.category, "filesystem");

        let class = rules.classify("ping", "Check host liveness");
        assert_eq!(class.category, "other");
    }

    #[test]
    fn test_builtin_has_no_priority_overrides() {
        let config = builtin_rules();
        assert!(config.always_loaded.is_empty());
        assert!(config.high_priority_servers.is_empty());
        assert!(config.low_priority_servers.is_empty());
    }
}
