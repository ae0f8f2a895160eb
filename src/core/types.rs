//! Core data types for the ragctx retrieval pipeline.
//!
//! Chunk records come out of the indexer, retrieved hits come out of
//! fusion (and optionally the reranker) and are consumed by the
//! context packer. Nothing here outlives a single retrieval call.

use serde::{Deserialize, Serialize};

/// A single chunk of a source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Unique within one indexing run, assigned in file-then-chunk order
    pub id: u64,

    /// Project-relative path with `/` separators
    pub rel_path: String,

    /// Chunk text (untrimmed window of the source)
    pub text: String,
}

/// A ranked retrieval candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedHit {
    pub id: u64,
    pub rel_path: String,
    pub text: String,

    /// Fused ranking score in [0, 1]
    pub score: f64,

    /// Best raw BM25 score across query variants
    pub bm25_score: f64,

    /// Fraction of queries with a positive lexical match
    pub query_coverage: f64,

    /// Relevance bonus derived from the file path
    pub path_boost: f64,

    /// Reranker relevance, present only when a reranker scored this hit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_score: Option<f64>,
}

/// Statistics from an indexing run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of files successfully read and chunked
    pub files_indexed: usize,

    /// Number of files skipped (unreadable, not UTF-8, ...)
    pub files_skipped: usize,

    /// Total chunks created
    pub chunks_created: usize,

    /// Indexing duration in milliseconds
    pub duration_ms: u64,
}

/// Round half away from zero to 4 decimal places.
pub fn round_score(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Clamp to [0, 1], mapping NaN to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
