//! Entity collections and the extractor seam
//!
//! Entity recognition itself lives outside the engine. The engine only reads
//! an [`EntityCollection`]; [`PatternEntityExtractor`] is a regex fallback for
//! callers that have no NER pipeline of their own.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{AnalyzerError, Result};

pub const CONTRACT_PARTIES: &str = "CONTRACT_PARTIES";
pub const MONEY_AMOUNTS: &str = "MONEY_AMOUNTS";
pub const GOVERNING_LAW_LOCATIONS: &str = "GOVERNING_LAW_LOCATIONS";
pub const CONTRACT_DATES: &str = "CONTRACT_DATES";
pub const COMPANY_NAMES: &str = "COMPANY_NAMES";
pub const DURATIONS: &str = "DURATIONS";
pub const DOCUMENT_TYPES: &str = "DOCUMENT_TYPES";
pub const ORGANIZATIONS: &str = "ORGANIZATIONS";
pub const PERSONS: &str = "PERSONS";
pub const LOCATIONS: &str = "LOCATIONS";
pub const LEGAL_CONCEPTS: &str = "LEGAL_CONCEPTS";
pub const CONTRACT_TITLES: &str = "CONTRACT_TITLES";
pub const CARDINAL_NUMBERS: &str = "CARDINAL_NUMBERS";
pub const ORDINAL_NUMBERS: &str = "ORDINAL_NUMBERS";

/// Categories every extraction reports, empty or not
pub const ENTITY_CATEGORIES: [&str; 14] = [
    CONTRACT_PARTIES,
    CONTRACT_DATES,
    MONEY_AMOUNTS,
    LOCATIONS,
    ORGANIZATIONS,
    PERSONS,
    LEGAL_CONCEPTS,
    DOCUMENT_TYPES,
    DURATIONS,
    GOVERNING_LAW_LOCATIONS,
    CONTRACT_TITLES,
    CARDINAL_NUMBERS,
    ORDINAL_NUMBERS,
    COMPANY_NAMES,
];

/// Entity category name -> distinct extracted strings.
///
/// A missing category and an empty one mean the same thing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityCollection(BTreeMap<String, BTreeSet<String>>);

impl EntityCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate an externally produced collection.
    ///
    /// Expects an object whose values are arrays of strings.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            AnalyzerError::MalformedInput("entity collection must be an object".to_string())
        })?;

        let mut collection = Self::new();
        for (category, members) in object {
            let members = members.as_array().ok_or_else(|| {
                AnalyzerError::MalformedInput(format!(
                    "entity category '{category}' must be an array"
                ))
            })?;
            let mut values = BTreeSet::new();
            for member in members {
                let text = member.as_str().ok_or_else(|| {
                    AnalyzerError::MalformedInput(format!(
                        "entity category '{category}' contains a non-string member: {member}"
                    ))
                })?;
                values.insert(text.to_string());
            }
            collection.0.insert(category.clone(), values);
        }

        Ok(collection)
    }

    pub fn insert(&mut self, category: impl Into<String>, value: impl Into<String>) {
        self.0.entry(category.into()).or_default().insert(value.into());
    }

    /// Members of `category`, empty if the category is absent.
    pub fn get(&self, category: &str) -> BTreeSet<String> {
        self.0.get(category).cloned().unwrap_or_default()
    }

    pub fn has(&self, category: &str) -> bool {
        self.0.get(category).map_or(false, |values| !values.is_empty())
    }

    /// Categories with at least one member.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(category, _)| category.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }
}

impl<K, V, I> FromIterator<(K, I)> for EntityCollection
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = V>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut collection = Self::new();
        for (category, values) in iter {
            let entry = collection.0.entry(category.into()).or_default();
            entry.extend(values.into_iter().map(Into::into));
        }
        collection
    }
}

/// Produces an entity collection from cleaned document text.
pub trait EntityExtractor: Send + Sync {
    fn extract(&self, text: &str) -> EntityCollection;
}

/// Regex-based entity extraction for legal boilerplate.
///
/// Identifies party roles, money amounts, governing-law locations, dates,
/// durations, company names and document types.
pub struct PatternEntityExtractor {
    patterns: Vec<(Regex, &'static str)>, // (pattern, entity category)
}

impl PatternEntityExtractor {
    pub fn new() -> Self {
        // Compile regex patterns once - these should never fail
        // Capture group 1, when present, is the reported value
        let patterns = vec![
            (
                insensitive(r"\b(?:client|contractor|vendor|licensor|licensee|supplier|grantor|grantee|employer|employee|customer|service provider|disclosing party|receiving party)\b"),
                CONTRACT_PARTIES,
            ),
            (sensitive(r"\bParty [A-Z]\b"), CONTRACT_PARTIES),
            // Currency symbol then digits
            (
                sensitive(r"[$€£¥]\s?\d{1,3}(?:,\d{3})*(?:\.\d{2})?"),
                MONEY_AMOUNTS,
            ),
            // Digits then currency code/word
            (
                insensitive(r"\b\d{1,3}(?:,\d{3})*(?:\.\d{2})?\s?(?:usd|eur|gbp|dollars|euros|pounds|yen)\b"),
                MONEY_AMOUNTS,
            ),
            (
                sensitive(r"\b(?:[Ll]aws|[Jj]urisdiction) of (?:the )?(?:(?:State|Commonwealth) of )?([A-Z][A-Za-z]+(?: [A-Z][A-Za-z]+)*)"),
                GOVERNING_LAW_LOCATIONS,
            ),
            (
                sensitive(r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December) \d{1,2}, \d{4}\b"),
                CONTRACT_DATES,
            ),
            (sensitive(r"\b\d{1,2}/\d{1,2}/\d{4}\b"), CONTRACT_DATES),
            (
                insensitive(r"\b\d+ (?:business |calendar )?(?:days?|weeks?|months?|years?)\b"),
                DURATIONS,
            ),
            (
                sensitive(r"\b(?:[A-Z][A-Za-z&]+ )+(?:Inc\.|LLC|Corp\.|Ltd\.|Co\.)"),
                COMPANY_NAMES,
            ),
            (
                insensitive(r"\bthis (?:agreement|contract|memorandum|indenture|deed)\b"),
                DOCUMENT_TYPES,
            ),
        ];

        Self { patterns }
    }
}

impl EntityExtractor for PatternEntityExtractor {
    fn extract(&self, text: &str) -> EntityCollection {
        let mut entities = EntityCollection::new();

        for (pattern, category) in &self.patterns {
            for cap in pattern.captures_iter(text) {
                let value = cap.get(1).or_else(|| cap.get(0)).map(|m| m.as_str().trim());
                if let Some(value) = value.filter(|v| !v.is_empty()) {
                    entities.insert(*category, value);
                }
            }
        }

        entities
    }
}

impl Default for PatternEntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn sensitive(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid regex pattern")
}

fn insensitive(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("Invalid regex pattern")
}
