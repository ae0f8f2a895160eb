//! Second-stage reranking of fused candidates.
//!
//! A [`Reranker`] scores candidates in [0, 1]. Scores are blended into
//! the fused score of the hits they name and the list is re-sorted.
//! A reranker that falls back leaves the ranking exactly as it was.

use std::collections::HashMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::core::routing::TaskMode;
use crate::core::search::sort_hits;
use crate::core::types::{clamp_unit, round_score, RetrievedHit};

/// Weight kept by the fused score when a reranker score is blended in
pub const PREVIOUS_WEIGHT: f64 = 0.6;

/// Weight given to the reranker score
pub const RERANK_WEIGHT: f64 = 0.4;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Compact view of a hit sent to a reranker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RerankCandidate {
    pub id: u64,
    #[serde(rename = "relPath")]
    pub rel_path: String,
    pub lexical_score: f64,
    pub snippet: String,
}

impl RerankCandidate {
    /// Take the first `snippet_chars` characters of the hit text and
    /// collapse whitespace runs to a single space.
    pub fn from_hit(hit: &RetrievedHit, snippet_chars: usize) -> Self {
        let head: String = hit.text.chars().take(snippet_chars).collect();
        Self {
            id: hit.id,
            rel_path: hit.rel_path.clone(),
            lexical_score: hit.score,
            snippet: WHITESPACE_RUN.replace_all(&head, " ").into_owned(),
        }
    }
}

/// Result of a rerank attempt
#[derive(Debug, Clone, PartialEq)]
pub enum RerankOutcome {
    /// Relevance per candidate id, each in [0, 1]
    Scored(HashMap<u64, f64>),

    /// The reranker could not produce usable scores
    Fallback { reason: String },
}

/// Scores candidate relevance for a task
#[async_trait]
pub trait Reranker: Send + Sync {
    async fn rerank(
        &self,
        task: &str,
        mode: TaskMode,
        candidates: &[RerankCandidate],
    ) -> RerankOutcome;
}

/// Extract `{"scores": [{"id", "score"}]}` from a reranker reply.
///
/// Entries whose id is not a non-negative integer are skipped. A score
/// may be a number or a numeric string; anything else counts as 0.
/// Returns `None` when the reply has no `scores` array.
pub fn parse_scores(reply: &serde_json::Value) -> Option<HashMap<u64, f64>> {
    let entries = reply.get("scores")?.as_array()?;

    let scores = entries
        .iter()
        .filter_map(|entry| {
            let id = entry.get("id")?.as_u64()?;
            let raw = match entry.get("score") {
                Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
                Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
                _ => 0.0,
            };
            Some((id, clamp_unit(raw)))
        })
        .collect();

    Some(scores)
}

/// Blend reranker scores into `hits` and re-sort.
///
/// Hits absent from `scores` keep their score and get no `llm_score`.
pub fn apply_rerank_scores(hits: &mut [RetrievedHit], scores: &HashMap<u64, f64>) {
    for hit in hits.iter_mut() {
        if let Some(&llm) = scores.get(&hit.id) {
            let llm = clamp_unit(llm);
            hit.llm_score = Some(round_score(llm));
            hit.score = round_score(PREVIOUS_WEIGHT * hit.score + RERANK_WEIGHT * llm);
        }
    }
    sort_hits(hits);
}

/// Run `reranker` over `hits`, keeping the current ranking on fallback.
///
/// Returns whether scores were applied.
pub async fn rerank_or_keep(
    reranker: &dyn Reranker,
    task: &str,
    mode: TaskMode,
    hits: &mut [RetrievedHit],
    snippet_chars: usize,
) -> bool {
    if hits.is_empty() {
        return false;
    }

    let candidates: Vec<RerankCandidate> = hits
        .iter()
        .map(|h| RerankCandidate::from_hit(h, snippet_chars))
        .collect();

    match reranker.rerank(task, mode, &candidates).await {
        RerankOutcome::Scored(scores) => {
            tracing::debug!(
                "Reranker scored {} of {} candidates",
                scores.len(),
                candidates.len()
            );
            apply_rerank_scores(hits, &scores);
            true
        }
        RerankOutcome::Fallback { reason } => {
            tracing::warn!("Rerank skipped, keeping fused ranking: {}", reason);
            false
        }
    }
}
