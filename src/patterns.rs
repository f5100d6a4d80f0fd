//! Compiled, case-insensitive pattern scanning
//!
//! Every rule table in the engine (clause categories, risk and favorable
//! rules) goes through [`CompiledPattern`], so the rest of the crate only
//! sees positioned matches and never touches the regex engine directly.

use regex::{Regex, RegexBuilder};

use crate::error::{AnalyzerError, Result};

/// A single non-overlapping, leftmost-first match.
///
/// Offsets are byte offsets into the scanned text; callers convert to
/// character offsets where they are exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternHit<'t> {
    pub start: usize,
    pub end: usize,
    pub text: &'t str,
}

/// A pattern compiled once for case-insensitive scanning.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
}

impl CompiledPattern {
    /// Compile `pattern` for rule `rule` (the rule name only shows up in errors).
    pub fn new(rule: &str, pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| AnalyzerError::InvalidPattern {
                rule: rule.to_string(),
                source,
            })?;

        Ok(Self { regex })
    }

    /// All non-overlapping matches, leftmost-first, in text order.
    pub fn scan<'t>(&self, text: &'t str) -> Vec<PatternHit<'t>> {
        self.regex
            .find_iter(text)
            .map(|m| PatternHit {
                start: m.start(),
                end: m.end(),
                text: m.as_str(),
            })
            .collect()
    }

    pub fn count(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }
}

/// Number of characters before byte offset `byte` in `text`.
pub fn char_offset(text: &str, byte: usize) -> usize {
    text[..byte].chars().count()
}

/// One-based line number of byte offset `byte`.
pub fn line_number(text: &str, byte: usize) -> usize {
    text[..byte].bytes().filter(|b| *b == b'\n').count() + 1
}

/// Text surrounding a match, extended by `radius` characters on each side
/// and clipped to the text bounds.
pub fn context_snippet(text: &str, start: usize, end: usize, radius: usize) -> String {
    let from = if radius == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .nth(radius - 1)
            .map(|(idx, _)| idx)
            .unwrap_or(0)
    };
    let to = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(idx, _)| end + idx)
        .unwrap_or(text.len());

    text[from..to].to_string()
}
