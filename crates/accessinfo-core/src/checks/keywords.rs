//! Bilingual keyword sets scanned in incoming correspondence.
//!
//! Departments reply in English or Traditional Chinese, so each set carries
//! both. Matching is substring containment with ASCII letters folded to
//! lowercase; other characters, including non-ASCII letters that fold to
//! ASCII under Unicode rules, match only themselves. Each set is compiled
//! once into an escaped alternation.

use lazy_static::lazy_static;
use regex::Regex;

/// Phrases signalling an interim reply or a request for more time.
pub const INTERIM_REPLY_TERMS: [&str; 8] = [
    "interim reply",
    "中期回覆",
    "more time",
    "需要更多時間",
    "extending",
    "延長",
    "additional time",
    "額外時間",
];

/// Phrases signalling that a delay past the target was explained.
pub const EXPLANATION_TERMS: [&str; 6] = [
    "extension",
    "延長",
    "exceptional",
    "特殊情況",
    "more time",
    "需要更多時間",
];

lazy_static! {
    static ref INTERIM_REPLY_PATTERN: Regex = keyword_pattern(&INTERIM_REPLY_TERMS);

    static ref EXPLANATION_PATTERN: Regex = keyword_pattern(&EXPLANATION_TERMS);
}

fn keyword_pattern(terms: &[&str]) -> Regex {
    let alternation = terms
        .iter()
        .map(|term| regex::escape(term))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).unwrap()
}

// ASCII lowercasing keeps every byte offset, so spans found in the folded
// text are valid in the original.
fn fold(body: &str) -> String {
    body.to_ascii_lowercase()
}

/// Byte spans of every interim-reply phrase in `body`.
pub fn find_interim_reply(body: &str) -> Vec<(usize, usize)> {
    INTERIM_REPLY_PATTERN
        .find_iter(&fold(body))
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// Byte spans of every delay-explanation phrase in `body`.
pub fn find_explanation(body: &str) -> Vec<(usize, usize)> {
    EXPLANATION_PATTERN
        .find_iter(&fold(body))
        .map(|m| (m.start(), m.end()))
        .collect()
}

pub fn mentions_interim_reply(body: &str) -> bool {
    INTERIM_REPLY_PATTERN.is_match(&fold(body))
}

pub fn mentions_explanation(body: &str) -> bool {
    EXPLANATION_PATTERN.is_match(&fold(body))
}
