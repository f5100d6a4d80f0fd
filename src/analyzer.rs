//! Legal analyzer - single-document analysis and two-document comparison
//!
//! Owns the compiled rule tables and the entity/summary collaborators.
//! Both entry points are pure over their inputs; the analyzer can be shared
//! across threads.

use regex::Regex;
use tracing::{debug, info};

use crate::comparator::DocumentComparator;
use crate::config::AnalyzerConfig;
use crate::critical::CriticalDifferenceDetector;
use crate::entities::{EntityCollection, EntityExtractor, PatternEntityExtractor};
use crate::error::Result;
use crate::matcher::ClauseMatcher;
use crate::overall::OverallSimilarityAggregator;
use crate::scorer::RiskScorer;
use crate::similarity::text_similarity;
use crate::summary::{LeadSummarizer, Summarizer};
use crate::types::{AnalysisResult, ComparisonResult, DocumentStatistics};

pub struct LegalAnalyzer {
    matcher: ClauseMatcher,
    scorer: RiskScorer,
    comparator: DocumentComparator,
    detector: CriticalDifferenceDetector,
    aggregator: OverallSimilarityAggregator,
    extractor: Box<dyn EntityExtractor>,
    summarizer: Box<dyn Summarizer>,
    paragraph_break: Regex,
    verbose: bool,
}

impl LegalAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        Ok(Self {
            matcher: ClauseMatcher::new(&config)?,
            scorer: RiskScorer::new(&config.scoring, config.verbose)?,
            comparator: DocumentComparator::new(&config.comparison),
            detector: CriticalDifferenceDetector::new(&config.comparison),
            aggregator: OverallSimilarityAggregator::new(&config.comparison),
            extractor: Box::new(PatternEntityExtractor::new()),
            summarizer: Box::new(LeadSummarizer::default()),
            paragraph_break: Regex::new(r"\n\s*\n").expect("Invalid regex pattern"),
            verbose: config.verbose,
        })
    }

    pub fn with_entity_extractor(mut self, extractor: impl EntityExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn with_summarizer(mut self, summarizer: impl Summarizer + 'static) -> Self {
        self.summarizer = Box::new(summarizer);
        self
    }

    /// Analyze cleaned text using the configured extractor and summarizer.
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let entities = self.extractor.extract(text);
        let summary = self.summarizer.summarize(text);
        self.analyze_with(text, entities, summary)
    }

    /// Analyze cleaned text with entity and summary output supplied by the caller.
    pub fn analyze_with(
        &self,
        text: &str,
        entities: EntityCollection,
        summary: impl Into<String>,
    ) -> AnalysisResult {
        let clause_matches = self.matcher.identify_clauses(text);
        let recommendation = self.scorer.score(text, &clause_matches, &entities);
        let statistics = self.statistics(text);

        info!(
            words = statistics.word_count,
            score = recommendation.score,
            label = %recommendation.recommendation_label,
            risks = recommendation.risk_findings.len(),
            "analysis.complete"
        );

        AnalysisResult {
            source: None,
            clause_matches,
            entities,
            summary: summary.into(),
            statistics,
            cleaned_text: text.to_string(),
            recommendation,
        }
    }

    pub fn compare(&self, doc1: &AnalysisResult, doc2: &AnalysisResult) -> ComparisonResult {
        let clause_differences = self.comparator.compare_clauses(doc1, doc2);
        let entity_differences = self.comparator.compare_entities(doc1, doc2);
        let summary_comparison = self.comparator.compare_summaries(doc1, doc2);
        let recommendation_comparison = self.comparator.compare_recommendations(doc1, doc2);
        let statistics_comparison = self.comparator.compare_statistics(doc1, doc2);

        let critical_differences = self.detector.detect(
            &clause_differences,
            &entity_differences,
            &recommendation_comparison,
        );
        let overall_similarity = self.aggregator.aggregate(
            &clause_differences,
            &entity_differences,
            text_similarity(&doc1.summary, &doc2.summary),
        );

        if self.verbose {
            for critical in &critical_differences {
                debug!(kind = %critical.kind, detail = %critical.detail, "comparison.critical");
            }
        }
        info!(
            overall = overall_similarity.percentage,
            critical = critical_differences.len(),
            score_difference = recommendation_comparison.score_difference,
            "comparison.complete"
        );

        ComparisonResult {
            doc1_path: doc1.source.clone(),
            doc2_path: doc2.source.clone(),
            clause_differences,
            entity_differences,
            summary_comparison,
            recommendation_comparison,
            statistics_comparison,
            critical_differences,
            overall_similarity,
        }
    }

    fn statistics(&self, text: &str) -> DocumentStatistics {
        DocumentStatistics {
            word_count: text.split_whitespace().count(),
            char_count: text.chars().count(),
            paragraph_count: self.paragraph_break.find_iter(text).count(),
        }
    }
}

impl Default for LegalAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default()).expect("built-in rule tables compile")
    }
}
