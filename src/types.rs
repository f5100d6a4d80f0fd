//! Core data types for analysis and comparison results

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::entities::EntityCollection;

/// Named clause categories detected by the clause matcher.
///
/// The set is closed: every analysis reports all of them, with an empty
/// match list when a category is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseCategory {
    Confidentiality,
    Indemnification,
    Liability,
    Termination,
    GoverningLaw,
    Amendment,
    DisputeResolution,
    ForceMajeure,
    Assignment,
    Warranty,
    Severability,
}

impl ClauseCategory {
    pub const ALL: [ClauseCategory; 11] = [
        ClauseCategory::Confidentiality,
        ClauseCategory::Indemnification,
        ClauseCategory::Liability,
        ClauseCategory::Termination,
        ClauseCategory::GoverningLaw,
        ClauseCategory::Amendment,
        ClauseCategory::DisputeResolution,
        ClauseCategory::ForceMajeure,
        ClauseCategory::Assignment,
        ClauseCategory::Warranty,
        ClauseCategory::Severability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClauseCategory::Confidentiality => "confidentiality",
            ClauseCategory::Indemnification => "indemnification",
            ClauseCategory::Liability => "liability",
            ClauseCategory::Termination => "termination",
            ClauseCategory::GoverningLaw => "governing_law",
            ClauseCategory::Amendment => "amendment",
            ClauseCategory::DisputeResolution => "dispute_resolution",
            ClauseCategory::ForceMajeure => "force_majeure",
            ClauseCategory::Assignment => "assignment",
            ClauseCategory::Warranty => "warranty",
            ClauseCategory::Severability => "severability",
        }
    }
}

impl fmt::Display for ClauseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One occurrence of a clause category in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseMatch {
    pub clause_category: ClauseCategory,
    pub matched_text: String,
    /// Character offsets `(start, end)` into the cleaned text
    pub span: (usize, usize),
    pub line_number: usize,
}

/// Clause matches for every category, each list sorted by line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClauseCategorySet(BTreeMap<ClauseCategory, Vec<ClauseMatch>>);

impl ClauseCategorySet {
    /// A set with every category present and empty.
    pub fn empty() -> Self {
        Self(
            ClauseCategory::ALL
                .iter()
                .map(|category| (*category, Vec::new()))
                .collect(),
        )
    }

    pub(crate) fn insert(&mut self, category: ClauseCategory, mut matches: Vec<ClauseMatch>) {
        matches.sort_by_key(|m| m.line_number);
        self.0.insert(category, matches);
    }

    pub fn get(&self, category: ClauseCategory) -> &[ClauseMatch] {
        self.0.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_present(&self, category: ClauseCategory) -> bool {
        !self.get(category).is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = ClauseCategory> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClauseCategory, &[ClauseMatch])> {
        self.0.iter().map(|(category, matches)| (*category, matches.as_slice()))
    }

    /// Categories with at least one match
    pub fn present(&self) -> impl Iterator<Item = ClauseCategory> + '_ {
        self.iter().filter(|(_, matches)| !matches.is_empty()).map(|(category, _)| category)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ClauseCategorySet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Missing categories deserialize as empty lists, so the set stays total.
impl<'de> Deserialize<'de> for ClauseCategorySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<ClauseCategory, Vec<ClauseMatch>>::deserialize(deserializer)?;
        let mut set = Self::empty();
        for (category, matches) in entries {
            set.insert(category, matches);
        }
        Ok(set)
    }
}

/// One scored observation contributing to the recommendation score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub category_key: String,
    pub description: String,
    pub signed_weight: i64,
    pub occurrence_count: usize,
    pub example_snippets: Vec<String>,
}

impl Finding {
    pub fn new(
        category_key: impl Into<String>,
        description: impl Into<String>,
        signed_weight: i64,
    ) -> Self {
        Self {
            category_key: category_key.into(),
            description: description.into(),
            signed_weight,
            occurrence_count: 0,
            example_snippets: Vec::new(),
        }
    }

    pub fn with_occurrences(
        mut self,
        occurrence_count: usize,
        example_snippets: Vec<String>,
    ) -> Self {
        self.occurrence_count = occurrence_count;
        self.example_snippets = example_snippets;
        self
    }
}

/// Score plus the findings that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningRecommendation {
    pub score: i64,
    pub recommendation_label: String,
    pub advice: String,
    pub favorable_findings: Vec<Finding>,
    pub risk_findings: Vec<Finding>,
    pub missing_clause_categories: Vec<ClauseCategory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentStatistics {
    pub word_count: usize,
    pub char_count: usize,
    pub paragraph_count: usize,
}

/// Full analysis of one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Path or label of the analyzed document, if the caller supplied one
    pub source: Option<String>,
    pub clause_matches: ClauseCategorySet,
    pub entities: EntityCollection,
    pub summary: String,
    pub statistics: DocumentStatistics,
    pub cleaned_text: String,
    pub recommendation: SigningRecommendation,
}

impl AnalysisResult {
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseStatus {
    PresentInBoth,
    OnlyInDoc1,
    OnlyInDoc2,
}

/// How one clause category differs between two documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseDifference {
    pub category: ClauseCategory,
    pub status: ClauseStatus,
    pub similarity_percent: f64,
    pub doc1_count: usize,
    pub doc2_count: usize,
    pub doc1_texts: Vec<String>,
    pub doc2_texts: Vec<String>,
    pub doc1_lines: Vec<usize>,
    pub doc2_lines: Vec<usize>,
    pub narrative: String,
}

/// Set comparison of one entity category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDifference {
    pub category: String,
    pub similarity_percent: f64,
    pub common: Vec<String>,
    pub only_in_doc1: Vec<String>,
    pub only_in_doc2: Vec<String>,
    pub doc1_count: usize,
    pub doc2_count: usize,
    /// "HIGH", "MEDIUM" or "LOW"
    pub significance_label: String,
    pub significance_note: String,
}

impl EntityDifference {
    pub fn has_asymmetry(&self) -> bool {
        !self.only_in_doc1.is_empty() || !self.only_in_doc2.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryComparison {
    pub doc1_summary: String,
    pub doc2_summary: String,
    pub similarity_percent: f64,
    pub key_differences: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationSide {
    pub score: i64,
    pub recommendation_label: String,
    pub risk_findings: Vec<Finding>,
    pub favorable_findings: Vec<Finding>,
}

impl From<&SigningRecommendation> for RecommendationSide {
    fn from(rec: &SigningRecommendation) -> Self {
        Self {
            score: rec.score,
            recommendation_label: rec.recommendation_label.clone(),
            risk_findings: rec.risk_findings.clone(),
            favorable_findings: rec.favorable_findings.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetterDocument {
    Document1,
    Document2,
    Similar,
}

impl BetterDocument {
    pub fn label(&self) -> &'static str {
        match self {
            BetterDocument::Document1 => "Document 1",
            BetterDocument::Document2 => "Document 2",
            BetterDocument::Similar => "Similar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetterDocumentVerdict {
    pub better_document: BetterDocument,
    pub reason: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationComparison {
    pub doc1: RecommendationSide,
    pub doc2: RecommendationSide,
    /// doc2 score minus doc1 score
    pub score_difference: i64,
    pub which_is_better: BetterDocumentVerdict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsDifferences {
    pub word_count_diff: i64,
    pub char_count_diff: i64,
    pub paragraph_count_diff: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsComparison {
    pub doc1: DocumentStatistics,
    pub doc2: DocumentStatistics,
    pub differences: StatisticsDifferences,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
}

/// A high-impact divergence between two documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalDifference {
    pub kind: String,
    pub severity: Severity,
    /// Set for `missing_clause` entries
    pub clause: Option<ClauseCategory>,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSimilarity {
    pub percentage: f64,
    pub interpretation: String,
    pub clause_similarity: f64,
    pub entity_similarity: f64,
    pub summary_similarity: f64,
}

/// Everything produced by comparing two analyzed documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub doc1_path: Option<String>,
    pub doc2_path: Option<String>,
    pub clause_differences: BTreeMap<ClauseCategory, ClauseDifference>,
    pub entity_differences: BTreeMap<String, EntityDifference>,
    pub summary_comparison: SummaryComparison,
    pub recommendation_comparison: RecommendationComparison,
    pub statistics_comparison: StatisticsComparison,
    pub critical_differences: Vec<CriticalDifference>,
    pub overall_similarity: OverallSimilarity,
}

/// Round to two decimals, as every reported percentage is.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_is_total() {
        let set = ClauseCategorySet::empty();
        assert_eq!(set.len(), ClauseCategory::ALL.len());
        assert!(ClauseCategory::ALL.iter().all(|c| set.get(*c).is_empty()));
    }

    #[test]
    fn test_display_matches_serialized_name() {
        for category in ClauseCategory::ALL {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json, category.to_string());
        }
    }

    #[test]
    fn test_partial_map_deserializes_to_total_set() {
        let json = serde_json::json!({
            "termination": [
                {
                    "clause_category": "termination",
                    "matched_text": "terminate",
                    "span": [40, 49],
                    "line_number": 3
                },
                {
                    "clause_category": "termination",
                    "matched_text": "Termination",
                    "span": [0, 11],
                    "line_number": 1
                }
            ]
        });
        let set: ClauseCategorySet = serde_json::from_value(json).unwrap();

        assert_eq!(set.len(), ClauseCategory::ALL.len());
        assert!(!set.is_present(ClauseCategory::Warranty));
        let lines: Vec<usize> = set
            .get(ClauseCategory::Termination)
            .iter()
            .map(|m| m.line_number)
            .collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn test_category_serializes_as_snake_case_key() {
        let set = ClauseCategorySet::empty();
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.get("governing_law").is_some());
        assert!(json.get("force_majeure").is_some());
    }
}
