//! Clause matcher - positions every clause category in a document

use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::patterns::{char_offset, line_number, CompiledPattern};
use crate::types::{ClauseCategory, ClauseCategorySet, ClauseMatch};

/// Scans cleaned text for the fixed set of clause categories.
#[derive(Debug, Clone)]
pub struct ClauseMatcher {
    patterns: Vec<(ClauseCategory, CompiledPattern)>,
}

impl ClauseMatcher {
    pub fn new(config: &AnalyzerConfig) -> Result<Self> {
        let patterns = ClauseCategory::ALL
            .iter()
            .map(|category| {
                let pattern =
                    CompiledPattern::new(category.as_str(), &config.clause_pattern(*category))?;
                Ok((*category, pattern))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Match every category against `text`.
    ///
    /// Categories without matches are still present, with an empty list.
    pub fn identify_clauses(&self, text: &str) -> ClauseCategorySet {
        let mut clauses = ClauseCategorySet::empty();

        for (category, pattern) in &self.patterns {
            let matches = pattern
                .scan(text)
                .into_iter()
                .map(|hit| ClauseMatch {
                    clause_category: *category,
                    matched_text: hit.text.to_string(),
                    span: (char_offset(text, hit.start), char_offset(text, hit.end)),
                    line_number: line_number(text, hit.start),
                })
                .collect();
            clauses.insert(*category, matches);
        }

        clauses
    }
}
