//! Packing retrieved hits under a character budget

use crate::common::{lexical_retriever, TestRepo};
use proptest::prelude::*;
use ragctx::core::context::{chunk_header, pack_context, TRUNCATION_MARKER};
use ragctx::core::types::RetrievedHit;

fn hit(id: u64, rel_path: &str, text: &str) -> RetrievedHit {
    RetrievedHit {
        id,
        rel_path: rel_path.to_string(),
        text: text.to_string(),
        score: 0.5,
        bm25_score: 1.0,
        query_coverage: 1.0,
        path_boost: 0.0,
        llm_score: None,
    }
}

fn full_join(hits: &[RetrievedHit]) -> String {
    hits.iter()
        .map(|h| format!("{}{}\n", chunk_header(h), h.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_packs_retrieved_hits_in_rank_order() {
    let repo = TestRepo::with_files(&[
        ("a.ts", "function foo() { return 1; }"),
        ("b.ts", "function bar() { return foo(); }"),
    ]);
    let retrieval =
        lexical_retriever(800, 0).retrieve_candidates(repo.path(), &repo.files, "foo", &[], 8);

    let context = pack_context(&retrieval.hits, 10_000);

    assert_eq!(context, full_join(&retrieval.hits));
    let first = context.find("--- CHUNK: ").unwrap();
    let header = chunk_header(&retrieval.hits[0]);
    assert_eq!(&context[first..first + header.len()], header);
}

#[test]
fn test_large_budget_keeps_everything() {
    let hits = vec![hit(0, "a.ts", "alpha"), hit(1, "b.ts", "beta")];
    let context = pack_context(&hits, 1_000);

    assert_eq!(
        context,
        "--- CHUNK: a.ts#0 (score=0.5) ---\nalpha\n\n--- CHUNK: b.ts#1 (score=0.5) ---\nbeta\n"
    );
}

#[test]
fn test_cut_inside_second_hit() {
    let hits = vec![hit(0, "a.ts", "alpha"), hit(1, "b.ts", "0123456789")];
    let first_section = "--- CHUNK: a.ts#0 (score=0.5) ---\nalpha\n".chars().count();
    let second_header = chunk_header(&hits[1]).chars().count();
    // Room for four characters of the second text
    let budget = first_section + 1 + second_header + 1 + 4;

    let context = pack_context(&hits, budget);

    assert!(context.ends_with(&format!("0123{TRUNCATION_MARKER}\n")));
    assert_eq!(
        context.chars().count(),
        budget + TRUNCATION_MARKER.chars().count()
    );
}

#[test]
fn test_budget_smaller_than_header_is_empty() {
    let hits = vec![hit(0, "a.ts", "alpha")];
    assert_eq!(pack_context(&hits, 10), "");
    assert_eq!(pack_context(&[], 10_000), "");
}

proptest! {
    #[test]
    fn prop_never_exceeds_budget_plus_marker(
        texts in prop::collection::vec("[a-z🚀中 \n]{0,80}", 0..8),
        max_chars in 0usize..600,
    ) {
        let hits: Vec<RetrievedHit> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| hit(i as u64, "src/file.ts", t))
            .collect();

        let context = pack_context(&hits, max_chars);
        let limit = max_chars + TRUNCATION_MARKER.chars().count();
        prop_assert!(context.chars().count() <= limit);

        // Without a marker the packed text fits the budget exactly
        if !context.contains(TRUNCATION_MARKER) {
            prop_assert!(context.chars().count() <= max_chars);
            prop_assert!(full_join(&hits).starts_with(&context));
        }
    }
}
