//! Overall similarity - weighted blend of clause, entity and summary similarity

use std::collections::BTreeMap;

use crate::config::ComparisonConfig;
use crate::types::{round2, ClauseCategory, ClauseDifference, EntityDifference, OverallSimilarity};

/// Interpretation bands, highest first (lower bounds inclusive)
const INTERPRETATIONS: [(f64, &str); 3] = [
    (80.0, "Documents are substantially similar"),
    (60.0, "Documents have moderate similarities with notable differences"),
    (40.0, "Documents have significant differences"),
];
const FALLBACK_INTERPRETATION: &str = "Documents are substantially different";

#[derive(Debug, Clone)]
pub struct OverallSimilarityAggregator {
    clause_weight: f64,
    entity_weight: f64,
    summary_weight: f64,
}

impl OverallSimilarityAggregator {
    pub fn new(config: &ComparisonConfig) -> Self {
        Self {
            clause_weight: config.clause_weight,
            entity_weight: config.entity_weight,
            summary_weight: config.summary_weight,
        }
    }

    /// `summary_similarity` is the raw 0.0-1.0 ratio.
    pub fn aggregate(
        &self,
        clause_diff: &BTreeMap<ClauseCategory, ClauseDifference>,
        entity_diff: &BTreeMap<String, EntityDifference>,
        summary_similarity: f64,
    ) -> OverallSimilarity {
        let clause_similarity = mean(clause_diff.values().map(|d| d.similarity_percent));
        let entity_similarity = mean(entity_diff.values().map(|d| d.similarity_percent));
        let summary_percent = summary_similarity * 100.0;

        let overall = clause_similarity * self.clause_weight
            + entity_similarity * self.entity_weight
            + summary_percent * self.summary_weight;

        let interpretation = INTERPRETATIONS
            .iter()
            .find(|(min, _)| overall >= *min)
            .map(|(_, text)| *text)
            .unwrap_or(FALLBACK_INTERPRETATION);

        OverallSimilarity {
            percentage: round2(overall),
            interpretation: interpretation.to_string(),
            clause_similarity: round2(clause_similarity),
            entity_similarity: round2(entity_similarity),
            summary_similarity: round2(summary_percent),
        }
    }
}

/// Arithmetic mean, 0.0 for no values.
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
