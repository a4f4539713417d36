//! Fusion engine: query routing, weighted score merge and post-filters.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{Bm25Index, FieldKind, PatternEngine, ScoredMatch, sort_by_score};
use crate::Result;
use crate::catalog::Catalog;
use crate::types::{ToolEntry, ToolSource};

pub const RELEVANCE_WEIGHT: f64 = 0.6;
pub const PATTERN_WEIGHT: f64 = 0.4;
pub const DEFAULT_LIMIT: usize = 5;
pub const MAX_LIMIT: usize = 10;

const REGEX_METACHARS: &[char] = &[
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];
const MIN_PATTERN_TOKEN_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    /// Regex when the query carries metacharacters, hybrid otherwise.
    #[default]
    Auto,
    Bm25,
    Regex,
    Hybrid,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(rename = "type", default)]
    pub kind: SearchKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ToolSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: SearchKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn source(mut self, source: ToolSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn min_score(mut self, min_score: f64) -> Self {
        self.min_score = Some(min_score);
        self
    }

    /// Requested limit, falling back to `default` and capped at 10.
    pub fn effective_limit(&self, default: usize) -> usize {
        self.limit.unwrap_or(default).min(MAX_LIMIT)
    }

    fn accepts(&self, entry: &ToolEntry, score: f64) -> bool {
        self.category.as_ref().is_none_or(|c| entry.category == *c)
            && self.source.is_none_or(|s| entry.source == s)
            && self.min_score.is_none_or(|min| score >= min)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub entry: ToolEntry,
    pub score: f64,
    pub matched_fields: Vec<FieldKind>,
}

pub fn has_regex_metachar(query: &str) -> bool {
    query.contains(REGEX_METACHARS)
}

/// Resolve `Auto` by query style; explicit kinds are honored as given.
pub fn classify_query(query: &str, requested: SearchKind) -> SearchKind {
    match requested {
        SearchKind::Auto if has_regex_metachar(query) => SearchKind::Regex,
        SearchKind::Auto => SearchKind::Hybrid,
        explicit => explicit,
    }
}

/// `create github issue` -> `create|github|issue`. `None` when no token
/// is long enough.
pub fn derive_pattern(query: &str) -> Option<String> {
    let alternatives: Vec<String> = query
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|t| t.chars().count() >= MIN_PATTERN_TOKEN_LEN)
        .map(|t| regex::escape(&t))
        .collect();

    (!alternatives.is_empty()).then(|| alternatives.join("|"))
}

/// A catalog plus the indexes built from it. Replaced wholesale on rebuild.
#[derive(Debug)]
pub struct SearchEngine {
    catalog: Arc<Catalog>,
    bm25: Bm25Index,
    pattern: PatternEngine,
}

impl SearchEngine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let bm25 = Bm25Index::build(&catalog);
        Self {
            catalog,
            bm25,
            pattern: PatternEngine::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn bm25(&self) -> &Bm25Index {
        &self.bm25
    }

    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchHit>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        // Caller patterns are validated even when nothing could match.
        let kind = classify_query(query, options.kind);
        let regex = match kind {
            SearchKind::Regex => Some(PatternEngine::compile(query)?),
            _ => None,
        };

        let limit = options.effective_limit(DEFAULT_LIMIT);
        if limit == 0 || self.catalog.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = limit * 2;
        tracing::debug!(query, ?kind, limit, "Routing tool search");

        let ranked = match regex {
            // The pattern engine applies its own `2 * limit` collection bound.
            Some(regex) => self.pattern.search_compiled(&self.catalog, &regex, limit),
            None if kind == SearchKind::Bm25 => self.bm25.search(&self.catalog, query, candidates),
            None => self.hybrid(query, candidates),
        };

        Ok(ranked
            .into_iter()
            .filter_map(|m| {
                let entry = self.catalog.tools().get(m.position)?;
                options.accepts(entry, m.score).then(|| SearchHit {
                    entry: entry.clone(),
                    score: m.score,
                    matched_fields: m.matched_fields,
                })
            })
            .take(limit)
            .collect())
    }

    fn hybrid(&self, query: &str, candidates: usize) -> Vec<ScoredMatch> {
        let relevance = self.bm25.search(&self.catalog, query, candidates);
        // Derived-pattern errors only drop the pattern half; errors are
        // reported for caller-supplied patterns alone.
        let pattern = derive_pattern(query)
            .map(|pattern| self.pattern.search(&self.catalog, &pattern, candidates))
            .transpose()
            .unwrap_or_else(|e| {
                tracing::debug!(query, error = %e, "Derived pattern rejected, using relevance only");
                None
            })
            .unwrap_or_default();
        fuse(relevance, pattern)
    }

    /// Autocomplete: matching names, keywords and aliases in catalog
    /// order, not ranked.
    pub fn suggest(&self, partial: &str, limit: usize) -> Vec<String> {
        let needle = partial.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut suggestions = Vec::new();
        for entry in self.catalog.tools() {
            let candidates = std::iter::once(&entry.name)
                .chain(entry.keywords.iter())
                .chain(entry.aliases.iter());
            for candidate in candidates {
                if candidate.to_lowercase().contains(&needle) && seen.insert(candidate.as_str()) {
                    suggestions.push(candidate.clone());
                    if suggestions.len() >= limit {
                        return suggestions;
                    }
                }
            }
        }
        suggestions
    }
}

/// `0.6 * relevance + 0.4 * pattern`, summed for entries found by both.
pub(crate) fn fuse(relevance: Vec<ScoredMatch>, pattern: Vec<ScoredMatch>) -> Vec<ScoredMatch> {
    let mut merged: Vec<ScoredMatch> = Vec::with_capacity(relevance.len() + pattern.len());
    let mut slots: HashMap<usize, usize> = HashMap::new();

    for (weight, matches) in [(RELEVANCE_WEIGHT, relevance), (PATTERN_WEIGHT, pattern)] {
        for m in matches {
            match slots.get(&m.position) {
                Some(&slot) => {
                    let existing = &mut merged[slot];
                    existing.score += weight * m.score;
                    existing.matched_fields.extend(m.matched_fields);
                    existing.matched_fields.sort();
                    existing.matched_fields.dedup();
                }
                None => {
                    slots.insert(m.position, merged.len());
                    merged.push(ScoredMatch {
                        position: m.position,
                        score: weight * m.score,
                        matched_fields: m.matched_fields,
                    });
                }
            }
        }
    }

    sort_by_score(&mut merged);
    merged
}
