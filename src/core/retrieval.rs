//! Retrieval orchestration.
//!
//! [`Retriever::retrieve_candidates`] runs the synchronous core: index
//! the files, build the lexical index and fuse the query variants.
//! [`Retriever::run`] wraps it with the optional collaborators
//! (routing before, reranking after) and packs the final context.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::core::config::{LlmConfig, RetrievalParams};
use crate::core::context::pack_context;
use crate::core::error::Result;
use crate::core::indexer::IndexingPipeline;
use crate::core::llm::{ChatClient, LlmReranker, LlmRouter};
use crate::core::rerank::{rerank_or_keep, Reranker};
use crate::core::routing::{route_or_heuristic, QueryRouter, TaskMode};
use crate::core::search::{collect_queries, FusionEngine, LexicalIndex};
use crate::core::types::{IndexStats, RetrievedHit};

/// Default snippet length shown to a reranker
pub const DEFAULT_SNIPPET_CHARS: usize = 260;

/// Output of the lexical stage
#[derive(Debug, Clone, Default)]
pub struct Retrieval {
    /// Queries actually scored, primary first
    pub queries: Vec<String>,
    pub hits: Vec<RetrievedHit>,
    pub index: IndexStats,
}

/// Optional collaborators for [`Retriever::run`]
pub struct Assist {
    pub router: Option<Box<dyn QueryRouter>>,
    pub reranker: Option<Box<dyn Reranker>>,
    pub snippet_chars: usize,
}

impl Default for Assist {
    fn default() -> Self {
        Self::none()
    }
}

impl Assist {
    /// Purely lexical: heuristic routing, no reranking
    pub fn none() -> Self {
        Self {
            router: None,
            reranker: None,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
        }
    }

    /// Build LLM collaborators when an API key is configured.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let mut assist = Self {
            snippet_chars: config.snippet_chars,
            ..Self::none()
        };

        if !config.is_configured() {
            tracing::debug!("LLM not configured, using lexical retrieval only");
            return Ok(assist);
        }

        let client = ChatClient::from_config(config)?;
        if config.enable_routing {
            assist.router = Some(Box::new(LlmRouter::new(client.clone())));
        }
        if config.enable_rerank {
            assist.reranker = Some(Box::new(LlmReranker::new(client)));
        }
        Ok(assist)
    }

    pub fn with_router(mut self, router: impl QueryRouter + 'static) -> Self {
        self.router = Some(Box::new(router));
        self
    }

    pub fn with_reranker(mut self, reranker: impl Reranker + 'static) -> Self {
        self.reranker = Some(Box::new(reranker));
        self
    }
}

/// Input of a full context build
#[derive(Debug, Clone)]
pub struct ContextRequest {
    pub root: PathBuf,
    /// Files in indexing order (absolute or root-relative)
    pub files: Vec<PathBuf>,
    pub task: String,
    /// Extra query variants, kept ahead of the routed ones
    pub variants: Vec<String>,
}

/// Counters describing one context build
#[derive(Debug, Clone, Default, Serialize)]
pub struct BundleStats {
    #[serde(flatten)]
    pub index: IndexStats,
    /// Candidates fused before the final top-k cut
    pub candidates: usize,
    pub routed: bool,
    pub reranked: bool,
    pub total_ms: u64,
}

/// Ranked hits plus the packed context
#[derive(Debug, Clone, Serialize)]
pub struct ContextBundle {
    pub mode: TaskMode,
    pub queries: Vec<String>,
    pub hits: Vec<RetrievedHit>,
    pub context: String,
    pub stats: BundleStats,
}

/// Runs retrieval with one set of tunables
#[derive(Debug, Clone)]
pub struct Retriever {
    params: RetrievalParams,
}

impl Retriever {
    pub fn new(params: RetrievalParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RetrievalParams {
        &self.params
    }

    /// Index `files`, fuse `query` and `variants`, keep `top_k` hits.
    ///
    /// An empty chunk set yields no hits.
    pub fn retrieve_candidates<P: AsRef<Path>>(
        &self,
        root: &Path,
        files: &[P],
        query: &str,
        variants: &[String],
        top_k: usize,
    ) -> Retrieval {
        let pipeline = IndexingPipeline::new(self.params.chunk_size, self.params.overlap);
        let outcome = pipeline.index_files(root, files);

        for (rel_path, reason) in outcome.skipped() {
            tracing::warn!("Skipped {}: {}", rel_path, reason);
        }

        let stats = outcome.stats();
        tracing::info!(
            "Indexed {} files ({} skipped), {} chunks in {}ms",
            stats.files_indexed,
            stats.files_skipped,
            stats.chunks_created,
            stats.duration_ms
        );

        let queries = collect_queries(query, variants, self.params.max_queries);
        tracing::debug!("Query set: {}", queries.join(" | "));

        if outcome.chunks.is_empty() {
            return Retrieval {
                queries,
                hits: Vec::new(),
                index: stats,
            };
        }

        let stop_words = &self.params.stop_words;
        let index = LexicalIndex::build(outcome.chunks, stop_words);
        let hits = FusionEngine::new(&index, stop_words, self.params.recall_k)
            .with_max_queries(self.params.max_queries)
            .fuse(query, variants, top_k);

        Retrieval {
            queries,
            hits,
            index: stats,
        }
    }

    /// Route, retrieve, rerank and pack.
    ///
    /// Collaborator failures fall back silently: routing to the keyword
    /// heuristic, reranking to the fused order.
    pub async fn run(&self, request: &ContextRequest, assist: &Assist) -> ContextBundle {
        let start = Instant::now();

        let route = route_or_heuristic(assist.router.as_deref(), &request.task).await;
        // Caller variants go ahead of routed ones so the query cap never drops them
        let variants: Vec<String> = request
            .variants
            .iter()
            .chain(route.queries.iter())
            .cloned()
            .collect();

        let retrieval = self.retrieve_candidates(
            &request.root,
            &request.files,
            &request.task,
            &variants,
            self.params.rerank_candidates.max(self.params.top_k),
        );
        let candidates = retrieval.hits.len();
        let mut hits = retrieval.hits;

        let reranked = match assist.reranker.as_deref() {
            Some(reranker) => {
                rerank_or_keep(
                    reranker,
                    &request.task,
                    route.mode,
                    &mut hits,
                    assist.snippet_chars,
                )
                .await
            }
            None => false,
        };

        hits.truncate(self.params.top_k);
        let context = pack_context(&hits, self.params.max_context_chars);

        tracing::info!("Mode: {}", route.mode);
        tracing::info!(
            "Hits: {}",
            if hits.is_empty() {
                "(none)".to_string()
            } else {
                hits.iter()
                    .map(|h| format!("{}#{}({})", h.rel_path, h.id, h.score))
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        );

        ContextBundle {
            mode: route.mode,
            queries: retrieval.queries,
            hits,
            context,
            stats: BundleStats {
                index: retrieval.index,
                candidates,
                routed: route.routed,
                reranked,
                total_ms: start.elapsed().as_millis() as u64,
            },
        }
    }
}
