//! Rule tables, weights and thresholds
//!
//! All tuning lives here so it can be overridden from a JSON document
//! without touching the engine. Defaults are one internally consistent
//! configuration: base score 60, occurrence cap 3, the risk/favorable
//! tables below, and the recommendation bands 80/65/50/35/20.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::entities::{
    COMPANY_NAMES, CONTRACT_DATES, CONTRACT_PARTIES, ENTITY_CATEGORIES, GOVERNING_LAW_LOCATIONS,
    MONEY_AMOUNTS,
};
use crate::error::{AnalyzerError, Result};
use crate::types::ClauseCategory;

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Clause category -> pattern. Categories left out use the built-in pattern.
    pub clause_patterns: BTreeMap<ClauseCategory, String>,
    pub scoring: ScoringConfig,
    pub comparison: ComparisonConfig,
    /// Emit per-finding debug events
    pub verbose: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            clause_patterns: default_clause_patterns(),
            scoring: ScoringConfig::default(),
            comparison: ComparisonConfig::default(),
            verbose: false,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            AnalyzerError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    /// Pattern for `category`, falling back to the built-in table.
    pub fn clause_pattern(&self, category: ClauseCategory) -> String {
        self.clause_patterns
            .get(&category)
            .cloned()
            .unwrap_or_else(|| builtin_clause_pattern(category).to_string())
    }
}

/// A weighted pattern rule. Negative weights are risks, positive are favorable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub key: String,
    pub pattern: String,
    pub weight: i64,
    pub description: String,
}

impl PatternRule {
    fn new(key: &str, pattern: &str, weight: i64, description: &str) -> Self {
        Self {
            key: key.to_string(),
            pattern: pattern.to_string(),
            weight,
            description: description.to_string(),
        }
    }
}

/// Score adjustment for the presence or absence of an entity category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRule {
    pub category: String,
    pub present_key: String,
    pub present_description: String,
    pub present_weight: i64,
    pub absent_key: String,
    pub absent_description: String,
    /// Zero means absence carries no penalty and records no finding
    pub absent_weight: i64,
}

impl EntityRule {
    fn new(
        category: &str,
        (present_key, present_description, present_weight): (&str, &str, i64),
        (absent_key, absent_description, absent_weight): (&str, &str, i64),
    ) -> Self {
        Self {
            category: category.to_string(),
            present_key: present_key.to_string(),
            present_description: present_description.to_string(),
            present_weight,
            absent_key: absent_key.to_string(),
            absent_description: absent_description.to_string(),
            absent_weight,
        }
    }
}

/// Lower bound (inclusive) of a recommendation band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationBand {
    pub min_score: i64,
    pub label: String,
    pub advice: String,
}

impl RecommendationBand {
    fn new(min_score: i64, label: &str, advice: &str) -> Self {
        Self {
            min_score,
            label: label.to_string(),
            advice: advice.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentShapeConfig {
    pub short_word_count: usize,
    pub short_penalty: i64,
    pub long_word_count: usize,
    pub long_penalty: i64,
    pub complex_word_length: f64,
    pub complex_multiplier: f64,
    pub plain_language_bonus: i64,
}

impl Default for DocumentShapeConfig {
    fn default() -> Self {
        Self {
            short_word_count: 200,
            short_penalty: 10,
            long_word_count: 5000,
            long_penalty: 5,
            complex_word_length: 7.0,
            complex_multiplier: 2.0,
            plain_language_bonus: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub base_score: i64,
    /// Occurrences beyond this count add no further weight
    pub occurrence_cap: usize,
    /// Characters of context on each side of a finding snippet
    pub snippet_radius: usize,
    /// Snippets kept per finding
    pub max_snippets: usize,
    pub risk_rules: Vec<PatternRule>,
    pub favorable_rules: Vec<PatternRule>,
    /// Clauses whose absence is penalized during scoring
    pub critical_clauses: Vec<ClauseCategory>,
    pub missing_clause_penalty: i64,
    pub present_clause_bonus: i64,
    pub document_shape: DocumentShapeConfig,
    pub entity_rules: Vec<EntityRule>,
    /// Checked in order; the first band whose lower bound is met wins
    pub recommendation_bands: Vec<RecommendationBand>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 60,
            occurrence_cap: 3,
            snippet_radius: 50,
            max_snippets: 2,
            risk_rules: default_risk_rules(),
            favorable_rules: default_favorable_rules(),
            critical_clauses: vec![
                ClauseCategory::Indemnification,
                ClauseCategory::GoverningLaw,
                ClauseCategory::Termination,
                ClauseCategory::DisputeResolution,
            ],
            missing_clause_penalty: 10,
            present_clause_bonus: 3,
            document_shape: DocumentShapeConfig::default(),
            entity_rules: default_entity_rules(),
            recommendation_bands: default_recommendation_bands(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Entity categories compared even when both documents have none
    pub entity_categories: Vec<String>,
    /// Entity categories where any asymmetry is HIGH significance
    pub critical_entity_categories: Vec<String>,
    /// Asymmetric differences above this mark other categories MEDIUM
    pub entity_difference_threshold: usize,
    /// Score gap that decides the better document outright
    pub better_document_margin: i64,
    /// Clauses whose one-sided presence is a critical difference
    pub critical_difference_clauses: Vec<ClauseCategory>,
    /// Score gap reported as a critical difference
    pub score_difference_threshold: i64,
    pub clause_weight: f64,
    pub entity_weight: f64,
    pub summary_weight: f64,
    pub max_summary_differences: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            entity_categories: ENTITY_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            critical_entity_categories: [
                CONTRACT_PARTIES,
                MONEY_AMOUNTS,
                GOVERNING_LAW_LOCATIONS,
                CONTRACT_DATES,
                COMPANY_NAMES,
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            entity_difference_threshold: 5,
            better_document_margin: 10,
            critical_difference_clauses: vec![
                ClauseCategory::Indemnification,
                ClauseCategory::Liability,
                ClauseCategory::Termination,
                ClauseCategory::GoverningLaw,
                ClauseCategory::DisputeResolution,
            ],
            score_difference_threshold: 15,
            clause_weight: 0.4,
            entity_weight: 0.3,
            summary_weight: 0.3,
            max_summary_differences: 2,
        }
    }
}

pub fn builtin_clause_pattern(category: ClauseCategory) -> &'static str {
    match category {
        ClauseCategory::Confidentiality => r"confidential(?:ity| information| agreement)",
        ClauseCategory::Indemnification => r"indemnif(?:y|ication|ies|ing)",
        ClauseCategory::Liability => r"liability|limitation of liability|disclaimer of liability",
        ClauseCategory::Termination => r"terminat(?:ion|e|es|ing)",
        ClauseCategory::GoverningLaw => r"governing law|choice of law|jurisdiction|venue",
        ClauseCategory::Amendment => r"amend(?:ment|ing|ed)",
        ClauseCategory::DisputeResolution => r"dispute resolution|arbitration|mediation",
        ClauseCategory::ForceMajeure => r"force majeure",
        ClauseCategory::Assignment => r"assign(?:ment|ability|s)",
        ClauseCategory::Warranty => r"warrant(?:y|ies|s)",
        ClauseCategory::Severability => r"severability",
    }
}

fn default_clause_patterns() -> BTreeMap<ClauseCategory, String> {
    ClauseCategory::ALL
        .iter()
        .map(|category| (*category, builtin_clause_pattern(*category).to_string()))
        .collect()
}

fn default_risk_rules() -> Vec<PatternRule> {
    vec![
        PatternRule::new(
            "unlimited_liability",
            r"unlimited liability|all liability|full liability|no limitation of liability",
            -20,
            "Unlimited or no limitation on liability",
        ),
        PatternRule::new(
            "unilateral_changes",
            r"(?:may|can|will) (?:modify|change|alter|amend) (?:at any time|without notice|in its sole discretion|unilaterally)",
            -15,
            "Party has unilateral modification rights",
        ),
        PatternRule::new(
            "broad_indemnification",
            r"indemnif(?:y|ication) (?:against|from) any and all (?:claims|losses|damages)",
            -12,
            "Broad indemnification clause",
        ),
        PatternRule::new(
            "automatic_renewal",
            r"automatically renew(?:s|ed|al)",
            -8,
            "Automatic renewal without clear termination notice",
        ),
        PatternRule::new(
            "no_assignment_without_consent",
            r"not assign(?:ed)? this agreement without.{1,50}prior (?:written )?consent",
            -7,
            "Restriction on assignment without consent",
        ),
        PatternRule::new(
            "broad_confidentiality",
            r"all(?: |\b)information(?: |\b)shall be considered confidential",
            -6,
            "Overly broad confidentiality definition",
        ),
        PatternRule::new(
            "non_negotiable",
            r"non-negotiable|not negotiable|as is|without recourse",
            -10,
            "Non-negotiable terms",
        ),
        PatternRule::new(
            "waiver_of_rights",
            r"waive(?:s|r of) (?:right|jury trial|class action)",
            -15,
            "Waiver of significant rights (e.g., jury trial)",
        ),
        PatternRule::new(
            "perpetual_obligations",
            r"(?:perpetual|eternal|indefinite|survive termination)",
            -8,
            "Perpetual obligations after termination",
        ),
    ]
}

fn default_favorable_rules() -> Vec<PatternRule> {
    vec![
        PatternRule::new(
            "mutual_termination",
            r"(?:either|both|any) part(?:y|ies) may terminate",
            12,
            "Mutual termination rights for all parties",
        ),
        PatternRule::new(
            "limited_liability",
            r"liability (?:limited to|shall not exceed) (?:[$€£]\d{1,3}(?:,\d{3})*(?:\.\d{2})?|the amount of this agreement)",
            15,
            "Liability is clearly limited to a specific amount",
        ),
        PatternRule::new(
            "reasonable_notice_period",
            r"(?:notice period|notice of \d+ (?:business )?(?:day|week|month|year)s) prior to termination",
            8,
            "Clearly defined reasonable notice period for termination",
        ),
        PatternRule::new(
            "clear_dispute_resolution",
            r"dispute resolution clause|(?:binding )?arbitration|(?:mandatory )?mediation",
            10,
            "Clear and defined alternative dispute resolution mechanism",
        ),
        PatternRule::new(
            "mutual_confidentiality",
            r"(?:both|all|either|respective) part(?:y|ies).{1,50}confidential(?:ity)? obligations",
            7,
            "Mutual confidentiality obligations",
        ),
        PatternRule::new(
            "governing_law_defined",
            r"governed by and construed in accordance with the laws of (?:the State of )?[A-Za-z ]+",
            8,
            "Clearly defined governing law and jurisdiction",
        ),
        PatternRule::new(
            "right_to_cure",
            r"(?:right to cure|opportunity to cure) (?:breach)?",
            7,
            "Opportunity to cure breaches before termination",
        ),
    ]
}

fn default_entity_rules() -> Vec<EntityRule> {
    vec![
        EntityRule::new(
            CONTRACT_PARTIES,
            ("clear_parties", "Clear identification of contract parties", 5),
            ("unclear_parties", "Ambiguous or missing contract parties", -8),
        ),
        EntityRule::new(
            MONEY_AMOUNTS,
            ("defined_money", "Presence of monetary terms", 3),
            ("undefined_money", "No monetary terms found", 0),
        ),
        EntityRule::new(
            GOVERNING_LAW_LOCATIONS,
            ("defined_governing_law", "Clearly defined governing law", 4),
            (
                "missing_governing_law_entity",
                "Governing law entity not explicitly found",
                -7,
            ),
        ),
    ]
}

fn default_recommendation_bands() -> Vec<RecommendationBand> {
    vec![
        RecommendationBand::new(80, "Highly Favorable", "Confident to sign after normal review."),
        RecommendationBand::new(65, "Favorable", "Consider signing with normal review."),
        RecommendationBand::new(
            50,
            "Moderately Favorable",
            "Review carefully; minor issues may exist.",
        ),
        RecommendationBand::new(
            35,
            "Neutral/Consult professional",
            "Consult a legal professional for review.",
        ),
        RecommendationBand::new(
            20,
            "Potentially Unfavorable",
            "Negotiate changes; significant risks identified.",
        ),
        RecommendationBand::new(
            i64::MIN,
            "Highly Unfavorable",
            "Do not sign; significant revisions or rejection recommended.",
        ),
    ]
}
