//! Normalized text similarity
//!
//! Every similarity in a comparison (clause texts, summaries) is the same
//! case-insensitive longest-common-subsequence ratio.

/// Similarity between two texts in `[0.0, 1.0]`.
///
/// Two empty texts are identical (1.0); exactly one empty text shares
/// nothing (0.0). Otherwise `2 * lcs / (len(a) + len(b))` over lowercased
/// characters, which is symmetric and reaches 1.0 only for equal texts.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    sequence_ratio(&a.to_lowercase(), &b.to_lowercase())
}

/// Calculate sequence similarity ratio (similar to difflib.SequenceMatcher.ratio)
///
/// Uses the longest common subsequence in place of Ratcliff-Obershelp blocks.
fn sequence_ratio(s1: &str, s2: &str) -> f64 {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    let total_len = s1_chars.len() + s2_chars.len();
    if total_len == 0 {
        return 1.0;
    }

    let lcs_len = longest_common_subsequence(&s1_chars, &s2_chars);
    (2.0 * lcs_len as f64) / total_len as f64
}

/// Calculate length of longest common subsequence (LCS)
fn longest_common_subsequence(s1: &[char], s2: &[char]) -> usize {
    // Iterate over the longer side so the rows stay short
    let (outer, inner) = if s1.len() >= s2.len() { (s1, s2) } else { (s2, s1) };
    let n = inner.len();

    // Use dynamic programming with space optimization
    let mut prev = vec![0usize; n + 1];
    let mut curr = vec![0usize; n + 1];

    for &outer_char in outer {
        for j in 1..=n {
            if outer_char == inner[j - 1] {
                curr[j] = prev[j - 1] + 1;
            } else {
                curr[j] = prev[j].max(curr[j - 1]);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
