//! Property tests for the chunker

use proptest::prelude::*;
use ragctx::core::indexer::Chunker;

proptest! {
    #[test]
    fn prop_windows_bounded_and_ordered(
        text in "[a-z🚀中é \n]{0,200}",
        chunk_size in 1usize..40,
        overlap in 0usize..60,
    ) {
        let chunker = Chunker::new(chunk_size, overlap);
        let chunks = chunker.chunk_text(&text);

        let mut search_from = 0;
        for chunk in &chunks {
            prop_assert!(chunk.chars().count() <= chunk_size);
            prop_assert!(!chunk.trim().is_empty());
            prop_assert!(text.contains(chunk.as_str()));
            // Windows are emitted left to right
            let byte_at = text[search_from..].find(chunk.as_str());
            prop_assert!(byte_at.is_some());
            search_from += byte_at.unwrap_or(0);
        }
    }

    #[test]
    fn prop_no_overlap_concatenates_back(
        text in "[a-z0-9🚀中é]{1,200}",
        chunk_size in 1usize..40,
    ) {
        let chunks = Chunker::new(chunk_size, 0).chunk_text(&text);
        prop_assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn prop_every_visible_char_covered(
        text in "[a-z🚀 ]{1,120}",
        chunk_size in 2usize..20,
        overlap in 0usize..19,
    ) {
        let chunker = Chunker::new(chunk_size, overlap);
        let chunks = chunker.chunk_text(&text);
        let visible = text.chars().filter(|c| !c.is_whitespace()).count();
        let covered: usize = chunks
            .iter()
            .map(|c| c.chars().filter(|c| !c.is_whitespace()).count())
            .sum();
        prop_assert!(covered >= visible);
    }

    #[test]
    fn prop_default_windows_tile_the_text(text in "[a-z0-9]{0,3000}") {
        let chunker = Chunker::new(800, 120);
        let chunks = chunker.chunk_text(&text);

        // The first `step` chars of each window are disjoint and contiguous
        let tiled: String = chunks.iter().flat_map(|c| c.chars().take(680)).collect();
        prop_assert_eq!(&tiled, &text);
        if let Some(last) = chunks.last() {
            prop_assert_eq!(last.chars().skip(680).count(), 0);
        }

        let len = text.chars().count();
        prop_assert_eq!(chunks.len(), len.div_ceil(680));
    }
}
