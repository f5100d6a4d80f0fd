//! Risk scorer - turns pattern hits, clause presence, document shape and
//! entity density into a 0-100 signing recommendation.

use tracing::debug;

use crate::config::{PatternRule, RecommendationBand, ScoringConfig};
use crate::entities::EntityCollection;
use crate::error::Result;
use crate::patterns::{context_snippet, CompiledPattern};
use crate::types::{ClauseCategory, ClauseCategorySet, Finding, SigningRecommendation};

struct CompiledRule {
    rule: PatternRule,
    pattern: CompiledPattern,
}

impl CompiledRule {
    fn compile(rule: &PatternRule) -> Result<Self> {
        Ok(Self {
            pattern: CompiledPattern::new(&rule.key, &rule.pattern)?,
            rule: rule.clone(),
        })
    }
}

/// Findings accumulated while scoring one document
#[derive(Default)]
struct Tally {
    score: i64,
    favorable: Vec<Finding>,
    risks: Vec<Finding>,
}

impl Tally {
    fn favorable(&mut self, finding: Finding) {
        self.score += finding.signed_weight;
        self.favorable.push(finding);
    }

    fn risk(&mut self, finding: Finding) {
        self.score += finding.signed_weight;
        self.risks.push(finding);
    }
}

/// Deterministic weighted scorer over one document.
pub struct RiskScorer {
    config: ScoringConfig,
    risk_rules: Vec<CompiledRule>,
    favorable_rules: Vec<CompiledRule>,
    verbose: bool,
}

impl RiskScorer {
    pub fn new(config: &ScoringConfig, verbose: bool) -> Result<Self> {
        let risk_rules = config
            .risk_rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>>>()?;
        let favorable_rules = config
            .favorable_rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config: config.clone(),
            risk_rules,
            favorable_rules,
            verbose,
        })
    }

    pub fn score(
        &self,
        text: &str,
        clauses: &ClauseCategorySet,
        entities: &EntityCollection,
    ) -> SigningRecommendation {
        let mut tally = Tally {
            score: self.config.base_score,
            ..Tally::default()
        };

        // Risk and favorable rules share the same cap and snippet policy
        for rule in &self.risk_rules {
            if let Some(finding) = self.apply_rule(rule, text) {
                self.trace(&finding);
                tally.risk(finding);
            }
        }
        for rule in &self.favorable_rules {
            if let Some(finding) = self.apply_rule(rule, text) {
                self.trace(&finding);
                tally.favorable(finding);
            }
        }

        let missing_clause_categories = self.apply_clause_presence(clauses, &mut tally);
        self.apply_document_shape(text, &mut tally);
        self.apply_entity_density(entities, &mut tally);

        let score = tally.score.clamp(0, 100);
        let band = self.band_for(score);

        SigningRecommendation {
            score,
            recommendation_label: band.map(|b| b.label.clone()).unwrap_or_default(),
            advice: band.map(|b| b.advice.clone()).unwrap_or_default(),
            favorable_findings: tally.favorable,
            risk_findings: tally.risks,
            missing_clause_categories,
        }
    }

    fn apply_rule(&self, compiled: &CompiledRule, text: &str) -> Option<Finding> {
        let hits = compiled.pattern.scan(text);
        if hits.is_empty() {
            return None;
        }

        let counted = hits.len().min(self.config.occurrence_cap) as i64;
        let snippets = hits
            .iter()
            .take(self.config.max_snippets)
            .map(|hit| context_snippet(text, hit.start, hit.end, self.config.snippet_radius))
            .collect();

        let rule = &compiled.rule;
        Some(
            Finding::new(&rule.key, &rule.description, rule.weight * counted)
                .with_occurrences(hits.len(), snippets),
        )
    }

    fn apply_clause_presence(
        &self,
        clauses: &ClauseCategorySet,
        tally: &mut Tally,
    ) -> Vec<ClauseCategory> {
        let mut missing = Vec::new();

        for category in &self.config.critical_clauses {
            if clauses.is_present(*category) {
                let finding = Finding::new(
                    format!("present_{category}"),
                    format!("Presence of {category} clause"),
                    self.config.present_clause_bonus,
                );
                self.trace(&finding);
                tally.favorable(finding);
            } else {
                missing.push(*category);
                let finding = Finding::new(
                    format!("missing_{category}"),
                    format!("Missing {} clause", category.as_str().replace('_', " ")),
                    -self.config.missing_clause_penalty,
                );
                self.trace(&finding);
                tally.risk(finding);
            }
        }

        missing
    }

    fn apply_document_shape(&self, text: &str, tally: &mut Tally) {
        let shape = &self.config.document_shape;
        let words: Vec<&str> = text.split_whitespace().collect();
        let word_count = words.len();

        if word_count < shape.short_word_count {
            tally.risk(Finding::new(
                "short_document",
                "Document is very short, potentially incomplete",
                -shape.short_penalty,
            ));
        } else if word_count > shape.long_word_count {
            tally.risk(Finding::new(
                "long_document",
                "Document is very long, potentially complex",
                -shape.long_penalty,
            ));
        }

        let avg_word_length = average_word_length(&words);
        if avg_word_length > shape.complex_word_length {
            let excess = avg_word_length - shape.complex_word_length;
            let penalty = (excess * shape.complex_multiplier).round() as i64;
            // Always a risk, even when the rounded penalty is zero
            tally.risk(Finding::new(
                "complex_language",
                format!("Document uses complex language (avg word length: {avg_word_length:.2})"),
                -penalty,
            ));
        } else {
            // Plain language earns a flat bonus without a finding
            tally.score += shape.plain_language_bonus;
        }
    }

    fn apply_entity_density(&self, entities: &EntityCollection, tally: &mut Tally) {
        for rule in &self.config.entity_rules {
            if entities.has(&rule.category) {
                let finding =
                    Finding::new(&rule.present_key, &rule.present_description, rule.present_weight);
                self.trace(&finding);
                tally.favorable(finding);
            } else if rule.absent_weight != 0 {
                let finding =
                    Finding::new(&rule.absent_key, &rule.absent_description, rule.absent_weight);
                self.trace(&finding);
                tally.risk(finding);
            }
        }
    }

    fn band_for(&self, score: i64) -> Option<&RecommendationBand> {
        self.config
            .recommendation_bands
            .iter()
            .find(|band| score >= band.min_score)
    }

    fn trace(&self, finding: &Finding) {
        if self.verbose {
            debug!(
                key = %finding.category_key,
                weight = finding.signed_weight,
                occurrences = finding.occurrence_count,
                "scoring.finding"
            );
        }
    }
}

/// Mean character length of whitespace-split tokens; 0.0 for no tokens.
fn average_word_length(words: &[&str]) -> f64 {
    let total: usize = words.iter().map(|w| w.chars().count()).sum();
    total as f64 / words.len().max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;
    use crate::entities::{CONTRACT_PARTIES, GOVERNING_LAW_LOCATIONS, MONEY_AMOUNTS};
    use crate::matcher::ClauseMatcher;

    fn score_text(text: &str, entities: &EntityCollection) -> SigningRecommendation {
        let config = AnalyzerConfig::default();
        let matcher = ClauseMatcher::new(&config).unwrap();
        let scorer = RiskScorer::new(&config.scoring, false).unwrap();
        scorer.score(text, &matcher.identify_clauses(text), entities)
    }

    fn full_entities() -> EntityCollection {
        let mut entities = EntityCollection::new();
        entities.insert(CONTRACT_PARTIES, "Client");
        entities.insert(MONEY_AMOUNTS, "$100");
        entities.insert(GOVERNING_LAW_LOCATIONS, "Ohio");
        entities
    }

    fn filler(sentences: usize) -> String {
        "the party will pay the fee on time. ".repeat(sentences)
    }

    #[test]
    fn test_empty_text_is_degenerate_not_error() {
        let rec = score_text("", &EntityCollection::new());

        // 60 - 4*10 (critical clauses) - 10 (short) + 2 (plain) - 8 - 7 -> clamped
        assert_eq!(rec.score, 0);
        assert_eq!(rec.recommendation_label, "Highly Unfavorable");
        assert!(rec.risk_findings.iter().any(|f| f.category_key == "short_document"));
        assert_eq!(rec.missing_clause_categories.len(), 4);
    }

    #[test]
    fn test_single_risk_hit_costs_exactly_its_weight() {
        let entities = full_entities();
        let base = filler(40);
        let with_risk = format!("{base}unlimited liability applies. {base}");
        let without_risk = format!("{base}{base}");

        let risky = score_text(&with_risk, &entities);
        let clean = score_text(&without_risk, &entities);

        assert_eq!(clean.score - risky.score, 20);
        let finding = risky
            .risk_findings
            .iter()
            .find(|f| f.category_key == "unlimited_liability")
            .unwrap();
        assert_eq!(finding.signed_weight, -20);
        assert_eq!(finding.occurrence_count, 1);
        assert_eq!(finding.example_snippets.len(), 1);
    }

    #[test]
    fn test_repeated_hits_are_capped_at_three() {
        let text = format!("{}{}", "This is provided as is. ".repeat(5), filler(40));
        let rec = score_text(&text, &full_entities());

        let finding = rec
            .risk_findings
            .iter()
            .find(|f| f.category_key == "non_negotiable")
            .unwrap();
        assert_eq!(finding.occurrence_count, 5);
        assert_eq!(finding.signed_weight, -30);
        assert_eq!(finding.example_snippets.len(), 2);
    }

    #[test]
    fn test_snippets_carry_fifty_characters_of_context() {
        let prefix = "a".repeat(80);
        let suffix = "b".repeat(80);
        let text = format!("{prefix} without recourse {suffix}");
        let rec = score_text(&text, &full_entities());

        let finding = rec
            .risk_findings
            .iter()
            .find(|f| f.category_key == "non_negotiable")
            .unwrap();
        let snippet = &finding.example_snippets[0];
        assert_eq!(snippet.chars().count(), 50 + "without recourse".len() + 50);
    }

    #[test]
    fn test_critical_clause_presence_and_absence() {
        let text = "Either party may terminate. This Agreement is governed by the laws of Ohio.";
        let rec = score_text(text, &full_entities());

        assert!(rec
            .favorable_findings
            .iter()
            .any(|f| f.category_key == "present_termination" && f.signed_weight == 3));
        assert!(rec
            .risk_findings
            .iter()
            .any(|f| f.category_key == "missing_indemnification" && f.signed_weight == -10));
        assert_eq!(
            rec.missing_clause_categories,
            vec![
                ClauseCategory::Indemnification,
                ClauseCategory::GoverningLaw,
                ClauseCategory::DisputeResolution
            ]
        );
    }

    #[test]
    fn test_complex_language_penalty_is_rounded() {
        // every token is 12 characters -> 2 * (12 - 7) = 10
        let text = "indemnifying ".repeat(10);
        let rec = score_text(&text, &full_entities());

        let finding = rec
            .risk_findings
            .iter()
            .find(|f| f.category_key == "complex_language")
            .unwrap();
        assert_eq!(finding.signed_weight, -10);
    }

    #[test]
    fn test_entity_density_adjustments() {
        let rec = score_text(&filler(40), &EntityCollection::new());
        let keys: Vec<&str> = rec.risk_findings.iter().map(|f| f.category_key.as_str()).collect();

        assert!(keys.contains(&"unclear_parties"));
        assert!(keys.contains(&"missing_governing_law_entity"));
        assert!(!keys.contains(&"undefined_money"));

        let rec = score_text(&filler(40), &full_entities());
        let keys: Vec<&str> =
            rec.favorable_findings.iter().map(|f| f.category_key.as_str()).collect();
        assert_eq!(keys, vec!["clear_parties", "defined_money", "defined_governing_law"]);
    }

    #[test]
    fn test_long_document_penalty() {
        let rec = score_text(&"word ".repeat(5001), &full_entities());

        let finding = rec
            .risk_findings
            .iter()
            .find(|f| f.category_key == "long_document")
            .unwrap();
        assert_eq!(finding.signed_weight, -5);
        assert!(!rec.risk_findings.iter().any(|f| f.category_key == "short_document"));
    }

    #[test]
    fn test_length_thresholds_are_exclusive() {
        for words in [200, 5000] {
            let rec = score_text(&"word ".repeat(words), &full_entities());
            let keys: Vec<&str> =
                rec.risk_findings.iter().map(|f| f.category_key.as_str()).collect();
            assert!(!keys.contains(&"short_document"), "{words} words");
            assert!(!keys.contains(&"long_document"), "{words} words");
        }

        let rec = score_text(&"word ".repeat(199), &full_entities());
        assert!(rec.risk_findings.iter().any(|f| f.category_key == "short_document"));
    }

    #[test]
    fn test_zero_weight_findings_keep_their_side() {
        let mut config = AnalyzerConfig::default();
        config.scoring.missing_clause_penalty = 0;
        config.scoring.present_clause_bonus = 0;
        let matcher = ClauseMatcher::new(&config).unwrap();
        let scorer = RiskScorer::new(&config.scoring, false).unwrap();

        let text = format!("Either party may terminate. {}", filler(40));
        let rec = scorer.score(&text, &matcher.identify_clauses(&text), &full_entities());

        let missing = rec
            .risk_findings
            .iter()
            .find(|f| f.category_key == "missing_indemnification")
            .unwrap();
        assert_eq!(missing.signed_weight, 0);
        assert!(!rec
            .favorable_findings
            .iter()
            .any(|f| f.category_key.starts_with("missing_")));
        assert!(rec
            .favorable_findings
            .iter()
            .any(|f| f.category_key == "present_termination" && f.signed_weight == 0));
    }

    #[test]
    fn test_band_boundaries_are_inclusive() {
        let config = AnalyzerConfig::default();
        let scorer = RiskScorer::new(&config.scoring, false).unwrap();

        let label = |score| scorer.band_for(score).unwrap().label.clone();
        assert_eq!(label(80), "Highly Favorable");
        assert_eq!(label(79), "Favorable");
        assert_eq!(label(65), "Favorable");
        assert_eq!(label(50), "Moderately Favorable");
        assert_eq!(label(35), "Neutral/Consult professional");
        assert_eq!(label(20), "Potentially Unfavorable");
        assert_eq!(label(19), "Highly Unfavorable");
        assert_eq!(label(0), "Highly Unfavorable");
    }

    #[test]
    fn test_score_is_clamped_high() {
        let mut config = AnalyzerConfig::default();
        config.scoring.base_score = 500;
        let matcher = ClauseMatcher::new(&config).unwrap();
        let scorer = RiskScorer::new(&config.scoring, false).unwrap();

        let rec = scorer.score("", &matcher.identify_clauses(""), &EntityCollection::new());
        assert_eq!(rec.score, 100);
        assert_eq!(rec.recommendation_label, "Highly Favorable");
    }
}
