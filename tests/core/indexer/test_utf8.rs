//! Multi-byte chunking tests
//!
//! Chunk windows are counted in characters, so no window may split a
//! code point and every window holds at most `chunk_size` characters.

use crate::common::Utf8Samples;
use ragctx::core::indexer::Chunker;

fn assert_windows(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chunker = Chunker::new(chunk_size, overlap);
    let chunks = chunker.chunk_text(text);

    assert!(!chunks.is_empty(), "no chunks for {text:?}");
    for chunk in &chunks {
        assert!(
            chunk.chars().count() <= chunk_size,
            "chunk exceeds {} chars: {:?}",
            chunk_size,
            chunk
        );
        assert!(text.contains(chunk.as_str()));
    }
    chunks
}

#[test]
fn test_emoji_never_split() {
    let text = Utf8Samples::emoji_code();
    for size in [1, 2, 3, 5, 7, 16] {
        assert_windows(text, size, 0);
    }
}

#[test]
fn test_cjk_with_overlap() {
    let text = Utf8Samples::cjk_code();
    let chunks = assert_windows(text, 6, 2);

    // Consecutive windows share exactly `overlap` characters
    let first: Vec<char> = chunks[0].chars().collect();
    let second: Vec<char> = chunks[1].chars().collect();
    assert_eq!(&first[4..], &second[..2]);
}

#[test]
fn test_mixed_text_single_window() {
    let text = Utf8Samples::mixed();
    let chunker = Chunker::new(text.chars().count(), 0);
    assert_eq!(chunker.chunk_text(text), vec![text.to_string()]);
}

#[test]
fn test_only_emoji_chunks_by_char() {
    let text = "🚀🎉✅👍";
    let chunks = assert_windows(text, 1, 0);
    assert_eq!(chunks, vec!["🚀", "🎉", "✅", "👍"]);
}
