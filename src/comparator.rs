//! Document comparator - aligns the clause sets, entity sets, summaries,
//! scores and statistics of two analyzed documents.

use ahash::AHashSet;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::ComparisonConfig;
use crate::similarity::text_similarity;
use crate::types::{
    round2, AnalysisResult, BetterDocument, BetterDocumentVerdict, ClauseCategory,
    ClauseDifference, ClauseStatus, DocumentStatistics, EntityDifference, RecommendationComparison,
    SigningRecommendation, StatisticsComparison, StatisticsDifferences, SummaryComparison,
};

/// Pairwise comparison of two analysis results.
#[derive(Debug, Clone)]
pub struct DocumentComparator {
    config: ComparisonConfig,
}

impl DocumentComparator {
    pub fn new(config: &ComparisonConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Clause categories present in at least one document.
    ///
    /// Similarity is computed over the space-joined matched texts, and only
    /// when both sides have matches.
    pub fn compare_clauses(
        &self,
        doc1: &AnalysisResult,
        doc2: &AnalysisResult,
    ) -> BTreeMap<ClauseCategory, ClauseDifference> {
        let categories: BTreeSet<ClauseCategory> = doc1
            .clause_matches
            .categories()
            .chain(doc2.clause_matches.categories())
            .collect();

        let mut differences = BTreeMap::new();
        for category in categories {
            let doc1_matches = doc1.clause_matches.get(category);
            let doc2_matches = doc2.clause_matches.get(category);

            let status = match (doc1_matches.is_empty(), doc2_matches.is_empty()) {
                (false, false) => ClauseStatus::PresentInBoth,
                (false, true) => ClauseStatus::OnlyInDoc1,
                (true, false) => ClauseStatus::OnlyInDoc2,
                (true, true) => continue,
            };

            let doc1_texts: Vec<String> =
                doc1_matches.iter().map(|m| m.matched_text.clone()).collect();
            let doc2_texts: Vec<String> =
                doc2_matches.iter().map(|m| m.matched_text.clone()).collect();

            let similarity = match status {
                ClauseStatus::PresentInBoth => {
                    text_similarity(&doc1_texts.join(" "), &doc2_texts.join(" "))
                }
                _ => 0.0,
            };

            differences.insert(
                category,
                ClauseDifference {
                    category,
                    status,
                    similarity_percent: round2(similarity * 100.0),
                    doc1_count: doc1_texts.len(),
                    doc2_count: doc2_texts.len(),
                    narrative: clause_narrative(&doc1_texts, &doc2_texts, similarity),
                    doc1_lines: doc1_matches.iter().map(|m| m.line_number).collect(),
                    doc2_lines: doc2_matches.iter().map(|m| m.line_number).collect(),
                    doc1_texts,
                    doc2_texts,
                },
            );
        }

        differences
    }

    /// Jaccard comparison over the configured entity categories plus any
    /// other category either document carries.
    ///
    /// A category empty on both sides is identical (100%).
    pub fn compare_entities(
        &self,
        doc1: &AnalysisResult,
        doc2: &AnalysisResult,
    ) -> BTreeMap<String, EntityDifference> {
        let categories: BTreeSet<&str> = self
            .config
            .entity_categories
            .iter()
            .map(String::as_str)
            .chain(doc1.entities.categories())
            .chain(doc2.entities.categories())
            .collect();

        categories
            .into_iter()
            .map(|category| {
                let doc1_set = doc1.entities.get(category);
                let doc2_set = doc2.entities.get(category);

                let common: Vec<String> = doc1_set.intersection(&doc2_set).cloned().collect();
                let only_in_doc1: Vec<String> = doc1_set.difference(&doc2_set).cloned().collect();
                let only_in_doc2: Vec<String> = doc2_set.difference(&doc1_set).cloned().collect();
                let union = doc1_set.union(&doc2_set).count();

                let similarity = if union == 0 {
                    1.0
                } else {
                    common.len() as f64 / union as f64
                };

                let (level, note) =
                    self.entity_significance(category, only_in_doc1.len() + only_in_doc2.len());
                let difference = EntityDifference {
                    category: category.to_string(),
                    similarity_percent: round2(similarity * 100.0),
                    significance_label: level.to_string(),
                    significance_note: note.to_string(),
                    doc1_count: doc1_set.len(),
                    doc2_count: doc2_set.len(),
                    common,
                    only_in_doc1,
                    only_in_doc2,
                };
                (category.to_string(), difference)
            })
            .collect()
    }

    /// Significance level and explanatory note for one entity category.
    fn entity_significance(
        &self,
        category: &str,
        asymmetric: usize,
    ) -> (&'static str, &'static str) {
        let critical = self
            .config
            .critical_entity_categories
            .iter()
            .any(|c| c == category);

        match (critical, asymmetric) {
            (true, 0) => ("LOW", "Critical entities match"),
            (true, _) => ("HIGH", "Critical entity differences detected"),
            (false, n) if n > self.config.entity_difference_threshold => {
                ("MEDIUM", "Multiple entity differences")
            }
            (false, _) => ("LOW", "Minor entity differences"),
        }
    }

    pub fn compare_summaries(
        &self,
        doc1: &AnalysisResult,
        doc2: &AnalysisResult,
    ) -> SummaryComparison {
        let similarity = text_similarity(&doc1.summary, &doc2.summary);

        SummaryComparison {
            doc1_summary: doc1.summary.clone(),
            doc2_summary: doc2.summary.clone(),
            similarity_percent: round2(similarity * 100.0),
            key_differences: self.summary_differences(&doc1.summary, &doc2.summary),
        }
    }

    fn summary_differences(&self, summary1: &str, summary2: &str) -> Vec<String> {
        let sentences1 = summary_sentences(summary1);
        let sentences2 = summary_sentences(summary2);
        let set1: AHashSet<&str> = sentences1.iter().copied().collect();
        let set2: AHashSet<&str> = sentences2.iter().copied().collect();

        let limit = self.config.max_summary_differences;
        let unique_to_1: Vec<&str> = sentences1
            .iter()
            .copied()
            .filter(|s| !set2.contains(s))
            .take(limit)
            .collect();
        let unique_to_2: Vec<&str> = sentences2
            .iter()
            .copied()
            .filter(|s| !set1.contains(s))
            .take(limit)
            .collect();

        let mut differences = Vec::new();
        if !unique_to_1.is_empty() {
            differences.push(format!("Doc 1 unique points: {}", unique_to_1.join("; ")));
        }
        if !unique_to_2.is_empty() {
            differences.push(format!("Doc 2 unique points: {}", unique_to_2.join("; ")));
        }
        if differences.is_empty() {
            differences.push("Summaries are very similar".to_string());
        }
        differences
    }

    pub fn compare_recommendations(
        &self,
        doc1: &AnalysisResult,
        doc2: &AnalysisResult,
    ) -> RecommendationComparison {
        let rec1 = &doc1.recommendation;
        let rec2 = &doc2.recommendation;

        RecommendationComparison {
            doc1: rec1.into(),
            doc2: rec2.into(),
            score_difference: rec2.score - rec1.score,
            which_is_better: self.better_document(rec1, rec2),
        }
    }

    fn better_document(
        &self,
        rec1: &SigningRecommendation,
        rec2: &SigningRecommendation,
    ) -> BetterDocumentVerdict {
        let (score1, score2) = (rec1.score, rec2.score);
        let (risks1, risks2) = (rec1.risk_findings.len(), rec2.risk_findings.len());
        let margin = self.config.better_document_margin;

        if score2 > score1 + margin {
            verdict(
                BetterDocument::Document2,
                format!("Significantly higher score ({score2} vs {score1})"),
                "Consider using Document 2 as the base",
            )
        } else if score1 > score2 + margin {
            verdict(
                BetterDocument::Document1,
                format!("Significantly higher score ({score1} vs {score2})"),
                "Consider using Document 1 as the base",
            )
        } else if risks1 < risks2 {
            verdict(
                BetterDocument::Document1,
                format!("Fewer risk factors ({risks1} vs {risks2})"),
                "Document 1 has fewer identified risks",
            )
        } else if risks2 < risks1 {
            verdict(
                BetterDocument::Document2,
                format!("Fewer risk factors ({risks2} vs {risks1})"),
                "Document 2 has fewer identified risks",
            )
        } else {
            verdict(
                BetterDocument::Similar,
                "Both documents have comparable scores and risk profiles".to_string(),
                "Review both documents carefully; consider combining favorable terms",
            )
        }
    }

    pub fn compare_statistics(
        &self,
        doc1: &AnalysisResult,
        doc2: &AnalysisResult,
    ) -> StatisticsComparison {
        let (s1, s2): (DocumentStatistics, DocumentStatistics) = (doc1.statistics, doc2.statistics);

        StatisticsComparison {
            doc1: s1,
            doc2: s2,
            differences: StatisticsDifferences {
                word_count_diff: s2.word_count as i64 - s1.word_count as i64,
                char_count_diff: s2.char_count as i64 - s1.char_count as i64,
                paragraph_count_diff: s2.paragraph_count as i64 - s1.paragraph_count as i64,
            },
        }
    }
}

fn verdict(
    better_document: BetterDocument,
    reason: String,
    recommendation: &str,
) -> BetterDocumentVerdict {
    BetterDocumentVerdict {
        better_document,
        reason,
        recommendation: recommendation.to_string(),
    }
}

/// Human-readable account of how one clause category differs.
fn clause_narrative(doc1_texts: &[String], doc2_texts: &[String], similarity: f64) -> String {
    let (n1, n2) = (doc1_texts.len(), doc2_texts.len());

    if n1 == 0 && n2 == 0 {
        return "Clause absent in both documents".to_string();
    }
    if n1 == 0 {
        return format!("Clause only present in Document 2 ({n2} occurrence(s))");
    }
    if n2 == 0 {
        return format!("Clause only present in Document 1 ({n1} occurrence(s))");
    }

    let count_diff = n2 as i64 - n1 as i64;
    if count_diff > 0 {
        format!("Clause appears more frequently in Doc 2 (+{count_diff} occurrence(s))")
    } else if count_diff < 0 {
        format!("Clause appears more frequently in Doc 1 ({count_diff} occurrence(s))")
    } else if similarity > 0.9 {
        "Clauses are substantially similar".to_string()
    } else if similarity > 0.7 {
        "Clauses have moderate differences in wording".to_string()
    } else {
        "Clauses have significant wording differences".to_string()
    }
}

/// Trimmed, non-empty period-delimited sentences in order of appearance.
fn summary_sentences(summary: &str) -> Vec<&str> {
    let mut seen = AHashSet::new();
    summary
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty() && seen.insert(*s))
        .collect()
}
