//! Multi-query fusion.
//!
//! Each query in the set is scored independently with BM25. Per chunk
//! the engine keeps the best raw score, the best per-query normalized
//! score, how many queries matched it and a reciprocal-rank sum. These
//! signals and the path boost are blended into one fused score.

use std::collections::HashMap;

use crate::core::search::bm25::{IndexedDoc, LexicalIndex};
use crate::core::search::query::{collect_queries, PathHints};
use crate::core::search::tokenizer::StopWords;
use crate::core::types::{round_score, RetrievedHit};

/// Default cap on primary query plus variants
pub const MAX_QUERIES: usize = 4;

pub const WEIGHT_LEXICAL: f64 = 0.55;
pub const WEIGHT_COVERAGE: f64 = 0.25;
pub const WEIGHT_RANK: f64 = 0.10;
pub const WEIGHT_PATH: f64 = 0.10;

/// Normalized ranking signals of one candidate, each in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FusionSignals {
    pub norm_max: f64,
    pub query_coverage: f64,
    pub rank_norm: f64,
    pub path_boost: f64,
}

impl FusionSignals {
    /// Weighted blend of the signals
    pub fn fused_score(&self) -> f64 {
        WEIGHT_LEXICAL * self.norm_max
            + WEIGHT_COVERAGE * self.query_coverage
            + WEIGHT_RANK * self.rank_norm
            + WEIGHT_PATH * self.path_boost
    }
}

/// Per-chunk accumulator across queries
struct MergedCandidate<'a> {
    doc: &'a IndexedDoc,
    raw_max: f64,
    norm_max: f64,
    query_hits: usize,
    rank_score: f64,
}

impl<'a> MergedCandidate<'a> {
    fn new(doc: &'a IndexedDoc) -> Self {
        Self {
            doc,
            raw_max: 0.0,
            norm_max: 0.0,
            query_hits: 0,
            rank_score: 0.0,
        }
    }
}

/// Fuses BM25 rankings of several query variants over one index
#[derive(Debug, Clone)]
pub struct FusionEngine<'a> {
    index: &'a LexicalIndex,
    stop_words: &'a StopWords,
    recall_k: usize,
    max_queries: usize,
}

impl<'a> FusionEngine<'a> {
    /// `recall_k` bounds how many documents each query contributes
    pub fn new(index: &'a LexicalIndex, stop_words: &'a StopWords, recall_k: usize) -> Self {
        Self {
            index,
            stop_words,
            recall_k,
            max_queries: MAX_QUERIES,
        }
    }

    pub fn with_max_queries(mut self, max_queries: usize) -> Self {
        self.max_queries = max_queries;
        self
    }

    /// Rank chunks for `primary` and its `variants`, returning at most
    /// `top_k` hits with scores rounded to 4 decimal places.
    ///
    /// Candidates with neither a lexical match nor a path boost are
    /// dropped, unless every candidate is in that state.
    pub fn fuse(&self, primary: &str, variants: &[String], top_k: usize) -> Vec<RetrievedHit> {
        let queries = collect_queries(primary, variants, self.max_queries);

        // Insertion order is first-seen order, which the stable sort keeps for ties
        let mut merged: Vec<MergedCandidate<'a>> = Vec::new();
        let mut slots: HashMap<u64, usize> = HashMap::new();

        for query in &queries {
            let scored = self.index.search(query, self.stop_words, self.recall_k);
            let max_score = scored.iter().fold(0.0f64, |m, s| m.max(s.score));

            tracing::debug!(
                "Query '{}': {} candidates, max bm25 {:.4}",
                query,
                scored.iter().filter(|s| s.score > 0.0).count(),
                max_score
            );

            for (rank, item) in scored.iter().enumerate() {
                let slot = *slots.entry(item.doc.chunk.id).or_insert_with(|| {
                    merged.push(MergedCandidate::new(item.doc));
                    merged.len() - 1
                });
                let candidate = &mut merged[slot];

                let normalized = if max_score > 0.0 {
                    item.score / max_score
                } else {
                    0.0
                };

                candidate.raw_max = candidate.raw_max.max(item.score);
                candidate.norm_max = candidate.norm_max.max(normalized);
                if item.score > 0.0 {
                    candidate.query_hits += 1;
                }
                candidate.rank_score += 1.0 / (rank as f64 + 1.0);
            }
        }

        let hints = PathHints::from_queries(&queries);
        let total_queries = queries.len().max(1) as f64;

        let mut hits: Vec<RetrievedHit> = merged
            .into_iter()
            .map(|c| {
                let signals = FusionSignals {
                    norm_max: c.norm_max,
                    query_coverage: c.query_hits as f64 / total_queries,
                    rank_norm: (c.rank_score / total_queries).min(1.0),
                    path_boost: hints.boost(&c.doc.chunk.rel_path),
                };

                RetrievedHit {
                    id: c.doc.chunk.id,
                    rel_path: c.doc.chunk.rel_path.clone(),
                    text: c.doc.chunk.text.clone(),
                    score: round_score(signals.fused_score()),
                    bm25_score: round_score(c.raw_max),
                    query_coverage: round_score(signals.query_coverage),
                    path_boost: round_score(signals.path_boost),
                    llm_score: None,
                }
            })
            .collect();

        sort_hits(&mut hits);

        if hits.iter().any(has_signal) {
            hits.retain(has_signal);
        }
        hits.truncate(top_k);
        hits
    }
}

/// Stable sort by fused score, then bm25 score, both descending
pub fn sort_hits(hits: &mut [RetrievedHit]) {
    hits.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.bm25_score.total_cmp(&a.bm25_score))
    });
}

fn has_signal(hit: &RetrievedHit) -> bool {
    hit.bm25_score > 0.0 || hit.path_boost > 0.0
}
