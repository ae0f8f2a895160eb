// Test helper functions

use ragctx::core::config::{Config, RetrievalParams};
use ragctx::core::retrieval::{Retrieval, Retriever};
use ragctx::core::services::Services;
use ragctx::core::types::{IndexStats, RetrievedHit};
use std::path::Path;

/// Create test services with default configuration and no LLM key
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services() -> Services {
    let mut config = Config::default();
    config.llm.api_key = None;
    Services::new(config)
}

/// Retriever with small chunks so short fixtures produce several chunks
#[allow(dead_code)] // Used in integration tests
pub fn lexical_retriever(chunk_size: usize, overlap: usize) -> Retriever {
    Retriever::new(RetrievalParams {
        chunk_size,
        overlap,
        ..RetrievalParams::default()
    })
}

/// Walk `repo_path` with the default patterns and retrieve for `query`
#[allow(dead_code)] // Used in integration tests
pub fn retrieve_in_repo(
    services: &Services,
    repo_path: &Path,
    query: &str,
    variants: &[&str],
    top_k: usize,
) -> Retrieval {
    let walker = services
        .create_walker(vec![], vec![])
        .expect("Failed to create walker");
    let files = walker
        .collect_files(repo_path)
        .expect("Failed to collect files");
    let retriever = services
        .create_retriever(&Default::default())
        .expect("Failed to create retriever");
    let variants: Vec<String> = variants.iter().map(|v| v.to_string()).collect();

    retriever.retrieve_candidates(repo_path, &files, query, &variants, top_k)
}

/// Assert that index stats are consistent
#[allow(dead_code)] // Used in integration tests
pub fn assert_valid_stats(stats: &IndexStats) {
    assert!(
        stats.files_indexed > 0,
        "Expected files_indexed > 0, got {}",
        stats.files_indexed
    );
    assert!(
        stats.chunks_created >= stats.files_indexed,
        "Expected chunks_created ({}) >= files_indexed ({})",
        stats.chunks_created,
        stats.files_indexed
    );
}

/// Assert every fused signal of every hit lies in [0, 1]
#[allow(dead_code)] // Used in integration tests
pub fn assert_scores_in_unit_range(hits: &[RetrievedHit]) {
    for hit in hits {
        for (name, value) in [
            ("score", hit.score),
            ("query_coverage", hit.query_coverage),
            ("path_boost", hit.path_boost),
        ] {
            assert!(
                (0.0..=1.0).contains(&value),
                "{} of {}#{} out of range: {}",
                name,
                hit.rel_path,
                hit.id,
                value
            );
        }
        assert!(hit.bm25_score >= 0.0);
    }
}
