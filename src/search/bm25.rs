//! BM25 relevance index over weighted tool documents.

use std::collections::{BTreeSet, HashMap};

use super::{ScoredMatch, overlapping_fields, sort_by_score};
use crate::catalog::Catalog;
use crate::text;
use crate::types::ToolEntry;

// Field repetition emulates per-field boosts in a single-field BM25.
const NAME_REPEAT: usize = 3;
const DISPLAY_NAME_REPEAT: usize = 2;
const KEYWORDS_REPEAT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    pub k1: f64,
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.2, b: 0.75 }
    }
}

impl Bm25Params {
    /// Saturated term-frequency component of one term in one document.
    pub fn term_weight(&self, tf: f64, doc_len: f64, avg_doc_len: f64) -> f64 {
        let norm = 1.0 - self.b + self.b * (doc_len / avg_doc_len.max(1.0));
        tf * (self.k1 + 1.0) / (tf + self.k1 * norm)
    }

    pub fn idf(&self, total_docs: usize, doc_freq: usize) -> f64 {
        let n = total_docs as f64;
        let df = doc_freq as f64;
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }
}

/// Inverted index built once per catalog.
#[derive(Debug, Clone, Default)]
pub struct Bm25Index {
    params: Bm25Params,
    postings: HashMap<String, HashMap<usize, u32>>,
    doc_lengths: Vec<usize>,
    avg_doc_len: f64,
}

impl Bm25Index {
    pub fn build(catalog: &Catalog) -> Self {
        Self::with_params(catalog, Bm25Params::default())
    }

    pub fn with_params(catalog: &Catalog, params: Bm25Params) -> Self {
        let mut postings: HashMap<String, HashMap<usize, u32>> = HashMap::new();
        let mut doc_lengths = Vec::with_capacity(catalog.len());

        for (position, entry) in catalog.tools().iter().enumerate() {
            let tokens = text::tokenize(&Self::document(entry));
            doc_lengths.push(tokens.len());
            for token in tokens {
                *postings.entry(token).or_default().entry(position).or_default() += 1;
            }
        }

        let avg_doc_len = if doc_lengths.is_empty() {
            0.0
        } else {
            doc_lengths.iter().sum::<usize>() as f64 / doc_lengths.len() as f64
        };

        Self {
            params,
            postings,
            doc_lengths,
            avg_doc_len,
        }
    }

    /// The weighted text indexed for `entry`.
    pub fn document(entry: &ToolEntry) -> String {
        let mut parts: Vec<&str> = Vec::new();
        parts.extend(std::iter::repeat_n(entry.name.as_str(), NAME_REPEAT));
        parts.extend(std::iter::repeat_n(
            entry.display_name.as_str(),
            DISPLAY_NAME_REPEAT,
        ));
        parts.push(&entry.description);
        for _ in 0..KEYWORDS_REPEAT {
            parts.extend(entry.keywords.iter().map(String::as_str));
        }
        parts.extend(entry.aliases.iter().map(String::as_str));
        parts.push(&entry.category);
        if let Some(subcategory) = &entry.subcategory {
            parts.push(subcategory);
        }
        parts.join(" ")
    }

    /// Query terms: tokenized, stopwords removed, deduplicated.
    pub fn query_terms(query: &str) -> Vec<String> {
        let mut terms: Vec<String> = Vec::new();
        for token in text::tokenize(query) {
            if !text::is_stopword(&token) && !terms.contains(&token) {
                terms.push(token);
            }
        }
        terms
    }

    pub fn len(&self) -> usize {
        self.doc_lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_lengths.is_empty()
    }

    pub fn avg_doc_len(&self) -> f64 {
        self.avg_doc_len
    }

    pub fn doc_freq(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, HashMap::len)
    }

    pub fn term_freq(&self, term: &str, position: usize) -> u32 {
        self.postings
            .get(term)
            .and_then(|docs| docs.get(&position))
            .copied()
            .unwrap_or(0)
    }

    /// Score every document sharing at least one term with `query`.
    /// `catalog` must be the catalog this index was built from.
    pub fn search(&self, catalog: &Catalog, query: &str, limit: usize) -> Vec<ScoredMatch> {
        let terms = Self::query_terms(query);
        if terms.is_empty() || limit == 0 {
            return Vec::new();
        }

        let candidates: BTreeSet<usize> = terms
            .iter()
            .filter_map(|t| self.postings.get(t))
            .flat_map(|docs| docs.keys().copied())
            .collect();

        let total_docs = self.len();
        let mut matches: Vec<ScoredMatch> = candidates
            .into_iter()
            .filter_map(|position| {
                let entry = catalog.tools().get(position)?;
                let score = self.score(&terms, position, total_docs);
                Some(ScoredMatch {
                    position,
                    score,
                    matched_fields: overlapping_fields(entry, &terms),
                })
            })
            .collect();

        sort_by_score(&mut matches);
        matches.truncate(limit);
        matches
    }

    fn score(&self, terms: &[String], position: usize, total_docs: usize) -> f64 {
        let doc_len = self.doc_lengths[position] as f64;
        terms
            .iter()
            .filter_map(|term| {
                let docs = self.postings.get(term)?;
                let tf = *docs.get(&position)? as f64;
                let idf = self.params.idf(total_docs, docs.len());
                Some(idf * self.params.term_weight(tf, doc_len, self.avg_doc_len))
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogBuilder, ProviderBatch};
    use crate::rules::ClassificationRules;
    use crate::types::{RawToolDescriptor, ToolSource};
    use std::sync::Arc;

    fn catalog() -> Catalog {
        CatalogBuilder::new(Arc::new(ClassificationRules::default()))
            .batches([
                ProviderBatch::new(
                    ToolSource::Mcp,
                    "weather",
                    vec![
                        RawToolDescriptor::new("get_weather", "Get current weather for a location"),
                        RawToolDescriptor::new("get_forecast", "Get weather forecast for days"),
                    ],
                ),
                ProviderBatch::new(
                    ToolSource::Mcp,
                    "database",
                    vec![
                        RawToolDescriptor::new("query", "Execute database query"),
                        RawToolDescriptor::new("insert", "Insert data into database"),
                    ],
                ),
            ])
            .build()
    }

    #[test]
    fn test_document_weighting() {
        let catalog = catalog();
        let doc = Bm25Index::document(&catalog.tools()[0]);
        let tokens = text::tokenize(&doc);
        let get_count = tokens.iter().filter(|t| *t == "get").count();
        // name x3, display name x2, description, keywords x2, both aliases
        assert_eq!(get_count, 3 + 2 + 1 + 2 + 2);
    }

    #[test]
    fn test_search_ranks_relevant_first() {
        let catalog = catalog();
        let index = Bm25Index::build(&catalog);

        let hits = index.search(&catalog, "weather location", 5);
        assert_eq!(hits.len(), 2);
        assert_eq!(catalog.tools()[hits[0].position].name, "get_weather");
        assert!(hits[0].score > hits[1].score);
        assert!(hits[0].matched_fields.contains(&crate::search::FieldKind::Description));
    }

    #[test]
    fn test_search_excludes_non_matching() {
        let catalog = catalog();
        let index = Bm25Index::build(&catalog);

        let hits = index.search(&catalog, "database", 5);
        let names: Vec<&str> = hits
            .iter()
            .map(|h| catalog.tools()[h.position].name.as_str())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"query"));
        assert!(names.contains(&"insert"));
    }

    #[test]
    fn test_empty_and_stopword_queries() {
        let catalog = catalog();
        let index = Bm25Index::build(&catalog);

        assert!(index.search(&catalog, "", 5).is_empty());
        assert!(index.search(&catalog, "the and for", 5).is_empty());
        assert!(index.search(&catalog, "!!! ?", 5).is_empty());
        assert!(index.search(&catalog, "weather", 0).is_empty());
    }

    #[test]
    fn test_limit_truncates() {
        let catalog = catalog();
        let index = Bm25Index::build(&catalog);
        assert_eq!(index.search(&catalog, "get database", 1).len(), 1);
    }

    #[test]
    fn test_idf_formula() {
        let params = Bm25Params::default();
        let expected = ((10.0 - 2.0 + 0.5) / (2.0 + 0.5) + 1.0_f64).ln();
        assert!((params.idf(10, 2) - expected).abs() < 1e-12);
        assert!(params.idf(10, 10) > 0.0);
        assert!(params.idf(10, 1) > params.idf(10, 5));
    }

    #[test]
    fn test_term_weight_non_decreasing_in_tf() {
        let params = Bm25Params::default();
        let mut previous = 0.0;
        for tf in 1..50 {
            let weight = params.term_weight(tf as f64, 20.0, 15.0);
            assert!(weight >= previous);
            previous = weight;
        }
        assert!(previous < params.k1 + 1.0);
    }

    #[test]
    fn test_score_matches_formula() {
        let catalog = catalog();
        let index = Bm25Index::build(&catalog);
        let params = Bm25Params::default();

        let hits = index.search(&catalog, "forecast", 5);
        assert_eq!(hits.len(), 1);
        let position = hits[0].position;

        let tf = index.term_freq("forecast", position) as f64;
        let doc_len = text::tokenize(&Bm25Index::document(&catalog.tools()[position])).len() as f64;
        let expected = params.idf(index.len(), index.doc_freq("forecast"))
            * params.term_weight(tf, doc_len, index.avg_doc_len());
        assert!((hits[0].score - expected).abs() < 1e-12);
    }
}
