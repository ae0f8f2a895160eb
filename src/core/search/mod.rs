//! Lexical search: tokenization, BM25 scoring and multi-query fusion.
//!
//! The index lives in memory for one retrieval call. Build it with the
//! same [`StopWords`] the queries are scored with.

mod bm25;
mod fusion;
mod query;
mod tokenizer;

pub use bm25::{IndexedDoc, LexicalIndex, ScoredDoc, B, K1};
pub use fusion::{
    sort_hits, FusionEngine, FusionSignals, MAX_QUERIES, WEIGHT_COVERAGE, WEIGHT_LEXICAL,
    WEIGHT_PATH, WEIGHT_RANK,
};
pub use query::{collect_queries, normalize_path, PathHints};
pub use tokenizer::{tokenize, StopWords};
