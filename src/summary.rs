//! Summarizer seam

use regex::Regex;

/// Produces a single summary string for a document.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, text: &str) -> String;
}

/// Extractive fallback: the first few sentences of the document.
pub struct LeadSummarizer {
    sentence_count: usize,
    boundary: Regex,
}

impl LeadSummarizer {
    pub fn new(sentence_count: usize) -> Self {
        Self {
            sentence_count,
            boundary: Regex::new(r"[.!?]+(?:\s+|$)").expect("Invalid regex pattern"),
        }
    }

    fn sentences<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut sentences = Vec::new();
        let mut last = 0;
        for m in self.boundary.find_iter(text) {
            let sentence = text[last..m.end()].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            last = m.end();
        }
        let tail = text[last..].trim();
        if !tail.is_empty() {
            sentences.push(tail);
        }
        sentences
    }
}

impl Summarizer for LeadSummarizer {
    fn summarize(&self, text: &str) -> String {
        self.sentences(text)
            .into_iter()
            .take(self.sentence_count)
            .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for LeadSummarizer {
    fn default() -> Self {
        Self::new(3)
    }
}
