//! Multi-query fusion scenarios

use crate::common::{
    assert_scores_in_unit_range, create_test_services, lexical_retriever, retrieve_in_repo,
    TestRepo,
};
use ragctx::core::config::RetrievalParams;
use ragctx::core::retrieval::Retriever;
use ragctx::core::types::round_score;

#[test]
fn test_single_file_exact_match() {
    let repo = TestRepo::with_files(&[("a.ts", "function foo() { return 1; }")]);

    let retrieval =
        lexical_retriever(800, 120).retrieve_candidates(repo.path(), &repo.files, "foo", &[], 8);

    assert_eq!(retrieval.queries, vec!["foo"]);
    assert_eq!(retrieval.hits.len(), 1);

    let hit = &retrieval.hits[0];
    assert_eq!(hit.id, 0);
    assert_eq!(hit.rel_path, "a.ts");
    assert_eq!(hit.query_coverage, 1.0);
    assert_eq!(hit.path_boost, 0.0);
    // 0.55 * 1 + 0.25 * 1 + 0.10 * 1
    assert_eq!(hit.score, 0.9);
    assert!(hit.bm25_score > 0.0);
}

#[test]
fn test_each_variant_matching_one_file_gives_half_coverage() {
    let repo = TestRepo::with_files(&[("a.ts", "alpha"), ("b.ts", "beta")]);

    let retrieval = lexical_retriever(800, 0).retrieve_candidates(
        repo.path(),
        &repo.files,
        "alpha",
        &["beta".to_string()],
        8,
    );

    assert_eq!(retrieval.hits.len(), 2);
    for hit in &retrieval.hits {
        assert_eq!(hit.query_coverage, 0.5);
        // 0.55 * 1 + 0.25 * 0.5 + 0.10 * (1 + 1/2) / 2
        assert_eq!(hit.score, 0.75);
    }
    // Equal scores keep first-seen order
    assert_eq!(retrieval.hits[0].rel_path, "a.ts");
    assert_eq!(retrieval.hits[1].rel_path, "b.ts");
}

#[test]
fn test_coverage_counts_only_lists_a_chunk_appears_in() {
    let repo = TestRepo::with_files(&[("a.ts", "alpha"), ("b.ts", "beta")]);
    let retriever = Retriever::new(RetrievalParams {
        chunk_size: 800,
        overlap: 0,
        recall_k: 1,
        ..RetrievalParams::default()
    });

    let retrieval =
        retriever.retrieve_candidates(repo.path(), &repo.files, "alpha", &["beta".to_string()], 8);

    // Each file is the only entry of exactly one recall list
    assert_eq!(retrieval.hits.len(), 2);
    for hit in &retrieval.hits {
        assert_eq!(hit.query_coverage, 0.5);
        // 0.55 * 1 + 0.25 * 0.5 + 0.10 * 1 / 2
        assert_eq!(hit.score, 0.725);
    }
}

#[test]
fn test_full_path_mention_boosts_file() {
    let repo = TestRepo::small();
    let services = create_test_services();

    let retrieval = retrieve_in_repo(&services, repo.path(), "fix retrieve.ts bug", &[], 8);

    // Nothing matches lexically, the path hint is the only signal
    assert_eq!(retrieval.hits.len(), 1);
    assert_eq!(retrieval.hits[0].rel_path, "src/retrieve.ts");
    assert_eq!(retrieval.hits[0].path_boost, 1.0);
    assert_eq!(retrieval.hits[0].bm25_score, 0.0);
}

#[test]
fn test_lexical_match_ranks_first() {
    let repo = TestRepo::small();
    let services = create_test_services();

    let retrieval = retrieve_in_repo(&services, repo.path(), "login password", &[], 8);

    assert!(!retrieval.hits.is_empty());
    assert_eq!(retrieval.hits[0].rel_path, "src/auth/login.ts");
    assert_scores_in_unit_range(&retrieval.hits);
}

#[test]
fn test_variant_adds_coverage_and_hits() {
    let repo = TestRepo::small();
    let services = create_test_services();

    let single = retrieve_in_repo(&services, repo.path(), "login", &[], 8);
    let multi = retrieve_in_repo(&services, repo.path(), "login", &["refresh session token"], 8);

    assert_eq!(multi.queries, vec!["login", "refresh session token"]);
    assert!(multi
        .hits
        .iter()
        .any(|h| h.rel_path == "src/auth/session.ts"));
    assert!(!single
        .hits
        .iter()
        .any(|h| h.rel_path == "src/auth/session.ts" && h.bm25_score > 0.0));
}

#[test]
fn test_no_signal_anywhere_keeps_candidates() {
    let repo = TestRepo::small();
    let services = create_test_services();

    let retrieval = retrieve_in_repo(&services, repo.path(), "zzqx wvvy", &[], 3);

    assert_eq!(retrieval.hits.len(), 3);
    for hit in &retrieval.hits {
        assert_eq!(hit.bm25_score, 0.0);
        assert_eq!(hit.path_boost, 0.0);
    }
}

#[test]
fn test_empty_project_yields_no_hits() {
    let repo = TestRepo::with_files(&[("blank.md", "  \n")]);

    let retrieval =
        lexical_retriever(800, 120).retrieve_candidates(repo.path(), &repo.files, "anything", &[], 8);

    assert!(retrieval.hits.is_empty());
    assert_eq!(retrieval.index.chunks_created, 0);
    assert_eq!(retrieval.index.files_indexed, 1);
}

#[test]
fn test_repeated_retrieval_is_identical() {
    let repo = TestRepo::medium();
    let services = create_test_services();

    let first = retrieve_in_repo(&services, repo.path(), "handler func", &["module 7"], 10);
    let second = retrieve_in_repo(&services, repo.path(), "handler func", &["module 7"], 10);

    assert_eq!(first.hits, second.hits);
    assert_eq!(first.queries, second.queries);
}

#[test]
fn test_scores_are_rounded_to_four_places() {
    let repo = TestRepo::medium();
    let services = create_test_services();

    let retrieval = retrieve_in_repo(&services, repo.path(), "func_3 handler_3", &["module"], 20);

    assert!(!retrieval.hits.is_empty());
    for hit in &retrieval.hits {
        assert_eq!(hit.score, round_score(hit.score));
        assert_eq!(hit.bm25_score, round_score(hit.bm25_score));
        assert_eq!(hit.query_coverage, round_score(hit.query_coverage));
    }
    assert_scores_in_unit_range(&retrieval.hits);
}
