//! Lexical tokenization shared by index build and query scoring.
//!
//! Text is lower-cased and split on every run of characters outside
//! ASCII letters, digits, `_` and the CJK unified ideograph block
//! U+4E00..U+9FA5. Single-character tokens and stop words are dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static TOKEN_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_\x{4E00}-\x{9FA5}]+").expect("valid separator regex"));

/// Set of tokens excluded from indexing and scoring.
///
/// The same set must be used for building an index and for querying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopWords(HashSet<String>);

impl StopWords {
    /// Built-in stop words (Chinese particles and English function words)
    pub const DEFAULT: &'static [&'static str] = &[
        "的", "了", "和", "是", "在", "我", "要", "把", "to", "the", "a", "an", "for", "and", "or",
        "is", "are",
    ];

    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(words.into_iter().map(Into::into).collect())
    }

    /// A set that filters nothing
    pub fn none() -> Self {
        Self(HashSet::new())
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for StopWords {
    fn default() -> Self {
        Self::new(Self::DEFAULT.iter().copied())
    }
}

/// Split text into index terms.
pub fn tokenize(text: &str, stop_words: &StopWords) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_SEPARATOR
        .split(&lowered)
        .filter(|t| !t.is_empty() && !stop_words.contains(t) && t.chars().count() > 1)
        .map(str::to_string)
        .collect()
}
