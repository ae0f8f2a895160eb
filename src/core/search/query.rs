//! Query set construction and path hints.
//!
//! A retrieval runs the primary query plus its variants. The combined
//! query text also yields path hints: full path-like tokens such as
//! `src/retrieve.ts` and word segments such as `retrieve`. A chunk
//! whose path matches these hints gets a boost during fusion.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static FULL_PATH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9_./-]+\.[a-z0-9]+").expect("valid full path regex"));

static SEGMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z0-9_]{2,}").expect("valid segment regex"));

static PATH_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9._/-]+").expect("valid path noise regex"));

/// Segments shorter than this never count towards a partial boost
const MIN_SEGMENT_LEN: usize = 3;

/// Segment matches needed for a full boost
const SEGMENTS_FOR_FULL_BOOST: f64 = 3.0;

/// Build the ordered query set.
///
/// The primary query comes first, then the variants. Entries are
/// trimmed, empty entries dropped, duplicates removed (first
/// occurrence wins) and the result capped at `max_queries`.
///
/// # Examples
///
/// ```
/// use ragctx::core::search::collect_queries;
///
/// let queries = collect_queries(" login bug ", &["auth".to_string(), "login bug".to_string()], 4);
/// assert_eq!(queries, vec!["login bug", "auth"]);
/// ```
pub fn collect_queries(primary: &str, variants: &[String], max_queries: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    std::iter::once(primary)
        .chain(variants.iter().map(String::as_str))
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .filter(|q| seen.insert(*q))
        .take(max_queries)
        .map(str::to_string)
        .collect()
}

/// Lower-case a path and blank out characters that never occur in hints
pub fn normalize_path(path: &str) -> String {
    let lowered = path.to_lowercase();
    PATH_NOISE.replace_all(&lowered, " ").trim().to_string()
}

/// Path hints extracted from the combined query text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathHints {
    /// Tokens with an extension-like suffix (`retrieve.ts`, `src/app.ts`)
    pub full_paths: HashSet<String>,

    /// Word-like segments of at least two characters
    pub segments: HashSet<String>,
}

impl PathHints {
    pub fn from_queries(queries: &[String]) -> Self {
        let joined = queries.join(" ").to_lowercase();

        let full_paths = FULL_PATH_PATTERN
            .find_iter(&joined)
            .map(|m| m.as_str().to_string())
            .collect();
        let segments = SEGMENT_PATTERN
            .find_iter(&joined)
            .map(|m| m.as_str().to_string())
            .collect();

        Self {
            full_paths,
            segments,
        }
    }

    /// Boost in [0, 1] for a chunk path.
    ///
    /// Any full path hint contained in the normalized path gives 1.
    /// Otherwise each segment hint of three or more characters found in
    /// the path adds a third, capped at 1.
    pub fn boost(&self, rel_path: &str) -> f64 {
        let path = normalize_path(rel_path);

        if self
            .full_paths
            .iter()
            .any(|full| !full.is_empty() && path.contains(full.as_str()))
        {
            return 1.0;
        }

        let hits = self
            .segments
            .iter()
            .filter(|seg| seg.chars().count() >= MIN_SEGMENT_LEN && path.contains(seg.as_str()))
            .count();

        if hits == 0 {
            0.0
        } else {
            (hits as f64 / SEGMENTS_FOR_FULL_BOOST).min(1.0)
        }
    }
}
