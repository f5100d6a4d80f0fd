use legal_risk_core::{
    AnalysisResult, AnalyzerConfig, BetterDocument, ClauseCategory, ClauseStatus, EntityCollection,
    LegalAnalyzer, Severity, CONTRACT_PARTIES, ENTITY_CATEGORIES, GOVERNING_LAW_LOCATIONS,
    MONEY_AMOUNTS,
};
use serde_json::json;

const SERVICE_AGREEMENT: &str = "SERVICE AGREEMENT\n\n\
    The Client engages the Contractor for consulting services.\n\n\
    Either party may terminate this Agreement with notice of 30 days prior to termination.\n\n\
    The Contractor shall indemnify the Client for losses caused by negligence.\n\n\
    Any dispute shall be resolved by binding arbitration in the jurisdiction of Ohio.\n\n\
    The Client shall pay $5,000 per month.";

fn entities(pairs: &[(&str, &str)]) -> EntityCollection {
    let mut collection = EntityCollection::new();
    for (category, member) in pairs {
        collection.insert(*category, *member);
    }
    collection
}

#[test]
fn test_self_comparison_is_identity() {
    let analyzer = LegalAnalyzer::default();
    let doc = analyzer.analyze(SERVICE_AGREEMENT);
    assert!(doc.clause_matches.present().count() >= 4);
    assert!(!doc.entities.is_empty());

    let comparison = analyzer.compare(&doc, &doc);

    assert!(comparison.critical_differences.is_empty());
    assert_eq!(comparison.overall_similarity.percentage, 100.0);
    assert_eq!(comparison.overall_similarity.interpretation, "Documents are substantially similar");
    assert_eq!(comparison.summary_comparison.key_differences, vec!["Summaries are very similar"]);
    assert_eq!(comparison.recommendation_comparison.score_difference, 0);
    assert_eq!(
        comparison.recommendation_comparison.which_is_better.better_document,
        BetterDocument::Similar
    );
    for difference in comparison.clause_differences.values() {
        assert_eq!(difference.status, ClauseStatus::PresentInBoth);
        assert_eq!(difference.similarity_percent, 100.0);
    }
    for difference in comparison.entity_differences.values() {
        assert_eq!(difference.similarity_percent, 100.0);
        assert_eq!(difference.significance_label, "LOW");
    }
}

#[test]
fn test_governing_law_and_money_asymmetry() {
    let analyzer = LegalAnalyzer::default();
    let doc1 = analyzer.analyze_with(
        "The governing law of this agreement is Ohio.",
        entities(&[(MONEY_AMOUNTS, "$500")]),
        "",
    );
    let doc2 = analyzer.analyze_with("Nothing in particular.", EntityCollection::new(), "");

    let comparison = analyzer.compare(&doc1, &doc2);

    let governing = &comparison.clause_differences[&ClauseCategory::GoverningLaw];
    assert_eq!(governing.status, ClauseStatus::OnlyInDoc1);
    assert_eq!(governing.similarity_percent, 0.0);

    let critical = &comparison.critical_differences;
    assert_eq!(critical.len(), 2);
    assert_eq!(critical[0].kind, "missing_clause");
    assert_eq!(critical[0].clause, Some(ClauseCategory::GoverningLaw));
    assert_eq!(critical[0].severity, Severity::High);
    assert_eq!(critical[1].kind, "financial_difference");
}

#[test]
fn test_entity_overlap_extremes() {
    let analyzer = LegalAnalyzer::default();
    let doc1 = analyzer.analyze_with(
        "",
        entities(&[
            (CONTRACT_PARTIES, "Client"),
            (CONTRACT_PARTIES, "Vendor"),
            (GOVERNING_LAW_LOCATIONS, "Ohio"),
        ]),
        "",
    );
    let doc2 = analyzer.analyze_with(
        "",
        entities(&[
            (CONTRACT_PARTIES, "Vendor"),
            (CONTRACT_PARTIES, "Client"),
            (GOVERNING_LAW_LOCATIONS, "Texas"),
        ]),
        "",
    );

    let comparison = analyzer.compare(&doc1, &doc2);

    let parties = &comparison.entity_differences[CONTRACT_PARTIES];
    assert_eq!(parties.similarity_percent, 100.0);
    assert_eq!(parties.common, vec!["Client", "Vendor"]);
    assert_eq!(parties.significance_label, "LOW");

    let locations = &comparison.entity_differences[GOVERNING_LAW_LOCATIONS];
    assert_eq!(locations.similarity_percent, 0.0);
    assert_eq!(locations.only_in_doc1, vec!["Ohio"]);
    assert_eq!(locations.only_in_doc2, vec!["Texas"]);
    assert_eq!(locations.significance_label, "HIGH");

    // Location mismatches are significant but not one of the scanned critical kinds
    assert!(comparison.critical_differences.is_empty());
}

#[test]
fn test_empty_documents() {
    let analyzer = LegalAnalyzer::default();
    let doc = analyzer.analyze("");

    assert_eq!(doc.recommendation.score, 0);
    assert_eq!(doc.recommendation.recommendation_label, "Highly Unfavorable");
    assert_eq!(doc.clause_matches.present().count(), 0);
    assert!(doc.entities.is_empty());
    assert_eq!(doc.summary, "");
    assert_eq!(doc.statistics.word_count, 0);
    assert_eq!(doc.statistics.paragraph_count, 0);

    let comparison = analyzer.compare(&doc, &doc);
    assert!(comparison.clause_differences.is_empty());
    assert!(comparison.critical_differences.is_empty());
    assert_eq!(comparison.entity_differences.len(), ENTITY_CATEGORIES.len());
    assert!(comparison
        .entity_differences
        .values()
        .all(|d| d.similarity_percent == 100.0));
    assert_eq!(comparison.summary_comparison.similarity_percent, 100.0);
    // No clauses: 0.4 * 0 + 0.3 * 100 + 0.3 * 100
    assert_eq!(comparison.overall_similarity.entity_similarity, 100.0);
    assert_eq!(comparison.overall_similarity.percentage, 60.0);
    assert_eq!(
        comparison.overall_similarity.interpretation,
        "Documents have moderate similarities with notable differences"
    );
}

#[test]
fn test_self_comparison_without_entities() {
    let analyzer = LegalAnalyzer::default();
    let entities = EntityCollection::from_json(&json!({ "CONTRACT_PARTIES": [] })).unwrap();
    let doc =
        analyzer.analyze_with("Either party may terminate this agreement.", entities, "Summary.");

    let comparison = analyzer.compare(&doc, &doc);

    assert_eq!(comparison.entity_differences[CONTRACT_PARTIES].similarity_percent, 100.0);
    assert_eq!(comparison.overall_similarity.entity_similarity, 100.0);
    assert_eq!(comparison.overall_similarity.percentage, 100.0);
    assert_eq!(comparison.overall_similarity.interpretation, "Documents are substantially similar");
}

#[test]
fn test_extra_entity_categories_join_the_comparison() {
    let analyzer = LegalAnalyzer::default();
    let doc1 = analyzer.analyze_with("", entities(&[("JURISDICTIONS", "Ohio")]), "");
    let doc2 = analyzer.analyze_with("", EntityCollection::new(), "");

    let comparison = analyzer.compare(&doc1, &doc2);

    assert_eq!(comparison.entity_differences.len(), ENTITY_CATEGORIES.len() + 1);
    assert_eq!(comparison.entity_differences["JURISDICTIONS"].similarity_percent, 0.0);
    assert_eq!(comparison.entity_differences["JURISDICTIONS"].significance_label, "LOW");
}

#[test]
fn test_better_document_by_score_margin() {
    let analyzer = LegalAnalyzer::default();
    let strong = analyzer.analyze(SERVICE_AGREEMENT);
    let weak = analyzer.analyze("");

    let comparison = analyzer.compare(&weak, &strong);
    let verdict = &comparison.recommendation_comparison.which_is_better;

    assert!(comparison.recommendation_comparison.score_difference > 10);
    assert_eq!(verdict.better_document, BetterDocument::Document2);
    assert_eq!(verdict.recommendation, "Consider using Document 2 as the base");
    assert!(verdict.reason.starts_with("Significantly higher score"));
}

#[test]
fn test_results_survive_json_transport() {
    let analyzer = LegalAnalyzer::default();
    let doc1 = analyzer.analyze(SERVICE_AGREEMENT).with_source("contract_a.txt");
    let doc2 = analyzer.analyze("The Client shall pay $7,500.");

    let json = serde_json::to_string(&doc1).unwrap();
    let restored: AnalysisResult = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, doc1);

    let direct = analyzer.compare(&doc1, &doc2);
    let transported = analyzer.compare(&restored, &doc2);
    assert_eq!(direct, transported);

    let value = serde_json::to_value(&direct).unwrap();
    assert_eq!(value["doc1_path"], "contract_a.txt");
    assert!(value["doc2_path"].is_null());
    assert_eq!(value["clause_differences"]["termination"]["status"], "only_in_doc1");
    assert_eq!(value["critical_differences"][0]["severity"], "HIGH");
}

#[test]
fn test_configuration_overrides_flow_through() {
    let config = AnalyzerConfig::from_json_str(r#"{ "scoring": { "base_score": 70 } }"#).unwrap();
    let analyzer = LegalAnalyzer::new(config).unwrap();

    // 70 - 40 (critical clauses) - 10 (short) + 2 (plain) - 8 (parties) - 7 (law)
    let doc = analyzer.analyze("");
    assert_eq!(doc.recommendation.score, 7);
}

#[test]
fn test_analyzer_is_shareable_across_threads() {
    let analyzer = std::sync::Arc::new(LegalAnalyzer::default());
    let expected = analyzer.analyze(SERVICE_AGREEMENT);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let analyzer = analyzer.clone();
            std::thread::spawn(move || analyzer.analyze(SERVICE_AGREEMENT))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
