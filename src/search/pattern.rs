//! Regex pattern engine scoring entries by field-level hits.

use regex::{Regex, RegexBuilder};

use super::{FieldKind, ScoredMatch, sort_by_score};
use crate::catalog::Catalog;
use crate::types::ToolEntry;
use crate::{Error, Result};

pub const MAX_PATTERN_LENGTH: usize = 200;

/// Stateless matcher; every call compiles its own pattern.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternEngine;

impl PatternEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn field_weight(field: FieldKind) -> f64 {
        match field {
            FieldKind::Name => 10.0,
            FieldKind::DisplayName => 5.0,
            FieldKind::Description => 3.0,
            FieldKind::Keywords => 4.0,
            FieldKind::Aliases => 2.0,
            FieldKind::Category => 2.0,
            FieldKind::Subcategory => 1.0,
        }
    }

    /// Case-insensitive compile; rejects patterns over 200 characters.
    pub fn compile(pattern: &str) -> Result<Regex> {
        let length = pattern.chars().count();
        if length > MAX_PATTERN_LENGTH {
            return Err(Error::PatternTooLong {
                length,
                max: MAX_PATTERN_LENGTH,
            });
        }

        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })
    }

    pub fn score_entry(regex: &Regex, entry: &ToolEntry) -> (f64, Vec<FieldKind>) {
        let mut score = 0.0;
        let mut fields = Vec::new();
        for field in FieldKind::ALL {
            if field.values(entry).iter().any(|value| regex.is_match(value)) {
                score += Self::field_weight(field);
                fields.push(field);
            }
        }
        (score, fields)
    }

    /// Collection stops once `2 * limit` matches are gathered, so a later
    /// entry can miss out on a slot it would have outscored.
    pub fn search(&self, catalog: &Catalog, pattern: &str, limit: usize) -> Result<Vec<ScoredMatch>> {
        let regex = Self::compile(pattern)?;
        Ok(self.search_compiled(catalog, &regex, limit))
    }

    pub fn search_compiled(&self, catalog: &Catalog, regex: &Regex, limit: usize) -> Vec<ScoredMatch> {
        let bound = limit.saturating_mul(2);

        let mut matches = Vec::new();
        for (position, entry) in catalog.tools().iter().enumerate() {
            if matches.len() >= bound {
                break;
            }
            let (score, matched_fields) = Self::score_entry(regex, entry);
            if score > 0.0 {
                matches.push(ScoredMatch {
                    position,
                    score,
                    matched_fields,
                });
            }
        }

        sort_by_score(&mut matches);
        matches.truncate(limit);
        matches
    }
}
