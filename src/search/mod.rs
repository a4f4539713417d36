//! Tool search: BM25 relevance ranking, regex pattern matching, and the
//! fusion engine that combines them.

mod bm25;
mod fusion;
mod pattern;

pub use bm25::{Bm25Index, Bm25Params};
pub use fusion::{
    DEFAULT_LIMIT, MAX_LIMIT, PATTERN_WEIGHT, RELEVANCE_WEIGHT, SearchEngine, SearchHit,
    SearchKind, SearchOptions, classify_query, derive_pattern, has_regex_metachar,
};
pub use pattern::{MAX_PATTERN_LENGTH, PatternEngine};

use serde::{Deserialize, Serialize};

use crate::types::ToolEntry;

/// Searchable fields of a [`ToolEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Name,
    DisplayName,
    Description,
    Keywords,
    Aliases,
    Category,
    Subcategory,
}

impl FieldKind {
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Name,
        FieldKind::DisplayName,
        FieldKind::Description,
        FieldKind::Keywords,
        FieldKind::Aliases,
        FieldKind::Category,
        FieldKind::Subcategory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::DisplayName => "displayName",
            Self::Description => "description",
            Self::Keywords => "keywords",
            Self::Aliases => "aliases",
            Self::Category => "category",
            Self::Subcategory => "subcategory",
        }
    }

    /// Values of this field on `entry`; empty for an absent subcategory.
    pub fn values<'a>(&self, entry: &'a ToolEntry) -> Vec<&'a str> {
        match self {
            Self::Name => vec![entry.name.as_str()],
            Self::DisplayName => vec![entry.display_name.as_str()],
            Self::Description => vec![entry.description.as_str()],
            Self::Keywords => entry.keywords.iter().map(String::as_str).collect(),
            Self::Aliases => entry.aliases.iter().map(String::as_str).collect(),
            Self::Category => vec![entry.category.as_str()],
            Self::Subcategory => entry.subcategory.as_deref().into_iter().collect(),
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An engine result referring to a catalog position.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    pub position: usize,
    pub score: f64,
    pub matched_fields: Vec<FieldKind>,
}

pub(crate) fn sort_by_score(matches: &mut [ScoredMatch]) {
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Fields sharing text with any query token, substring containment in
/// either direction. Informational only.
pub(crate) fn overlapping_fields(entry: &ToolEntry, tokens: &[String]) -> Vec<FieldKind> {
    FieldKind::ALL
        .into_iter()
        .filter(|field| {
            field.values(entry).iter().any(|value| {
                let value = value.to_lowercase();
                !value.is_empty()
                    && tokens
                        .iter()
                        .any(|t| value.contains(t.as_str()) || t.contains(value.as_str()))
            })
        })
        .collect()
}
