//! Critical difference detection
//!
//! Scan order is fixed: one-sided critical clauses, then parties, then
//! money, then the score gap. Entries are never re-sorted or merged.

use std::collections::BTreeMap;

use crate::config::ComparisonConfig;
use crate::entities::{CONTRACT_PARTIES, MONEY_AMOUNTS};
use crate::types::{
    ClauseCategory, ClauseDifference, ClauseStatus, CriticalDifference, EntityDifference,
    RecommendationComparison, Severity,
};

#[derive(Debug, Clone)]
pub struct CriticalDifferenceDetector {
    clauses: Vec<ClauseCategory>,
    score_threshold: i64,
}

impl CriticalDifferenceDetector {
    pub fn new(config: &ComparisonConfig) -> Self {
        Self {
            clauses: config.critical_difference_clauses.clone(),
            score_threshold: config.score_difference_threshold,
        }
    }

    pub fn detect(
        &self,
        clause_diff: &BTreeMap<ClauseCategory, ClauseDifference>,
        entity_diff: &BTreeMap<String, EntityDifference>,
        recommendation: &RecommendationComparison,
    ) -> Vec<CriticalDifference> {
        let mut critical = Vec::new();

        for clause in &self.clauses {
            if let Some(diff) = clause_diff.get(clause) {
                if diff.status != ClauseStatus::PresentInBoth {
                    critical.push(CriticalDifference {
                        kind: "missing_clause".to_string(),
                        severity: Severity::High,
                        clause: Some(*clause),
                        detail: diff.narrative.clone(),
                    });
                }
            }
        }

        if let Some(parties) = entity_diff.get(CONTRACT_PARTIES).filter(|d| d.has_asymmetry()) {
            critical.push(CriticalDifference {
                kind: "party_difference".to_string(),
                severity: Severity::High,
                clause: None,
                detail: format!(
                    "Different parties identified: {:?} vs {:?}",
                    parties.only_in_doc1, parties.only_in_doc2
                ),
            });
        }

        if let Some(money) = entity_diff.get(MONEY_AMOUNTS).filter(|d| d.has_asymmetry()) {
            critical.push(CriticalDifference {
                kind: "financial_difference".to_string(),
                severity: Severity::High,
                clause: None,
                detail: format!(
                    "Different monetary terms: {:?} vs {:?}",
                    money.only_in_doc1, money.only_in_doc2
                ),
            });
        }

        let score_diff = recommendation.score_difference.abs();
        if score_diff > self.score_threshold {
            critical.push(CriticalDifference {
                kind: "risk_score_difference".to_string(),
                severity: Severity::Medium,
                clause: None,
                detail: format!(
                    "Significant risk score difference: {:.1} points",
                    score_diff as f64
                ),
            });
        }

        critical
    }
}
