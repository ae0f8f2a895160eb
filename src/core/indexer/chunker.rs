//! UTF-8 safe sliding-window chunking.
//!
//! Windows are measured in **characters**, not bytes, and every
//! boundary comes from `char_indices()`, so multi-byte input never
//! panics.
//!
//! # Example
//!
//! ```
//! use ragctx::core::indexer::Chunker;
//!
//! let chunker = Chunker::new(10, 2);
//! let chunks = chunker.chunk_text("0123456789ABCDEFGHIJ");
//!
//! assert_eq!(chunks, vec!["0123456789", "89ABCDEFGH", "GHIJ"]);
//! ```

/// Sliding-window text chunker.
///
/// Consecutive windows start `chunk_size - overlap` characters
/// apart. A degenerate overlap (`overlap >= chunk_size`) is clamped
/// to a step of one character rather than rejected.
#[derive(Debug, Clone)]
pub struct Chunker {
    /// Number of characters per chunk
    chunk_size: usize,

    /// Number of characters shared by consecutive chunks
    overlap: usize,
}

impl Chunker {
    /// Create a new chunker.
    ///
    /// A `chunk_size` of 0 is treated as 1.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            overlap,
        }
    }

    /// Get the chunk size in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Get the overlap size in characters.
    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Distance in characters between consecutive window starts.
    pub fn step(&self) -> usize {
        self.chunk_size.saturating_sub(self.overlap).max(1)
    }

    /// Chunk text into overlapping windows.
    ///
    /// Windows that are empty or whitespace-only are dropped; the
    /// kept windows are returned untrimmed, left to right, including
    /// a trailing partial window.
    pub fn chunk_text(&self, text: &str) -> Vec<String> {
        // (byte offset, char) pairs keep every slice on a char boundary
        let char_indices: Vec<(usize, char)> = text.char_indices().collect();

        if char_indices.is_empty() {
            return Vec::new();
        }

        let step = self.step();
        let mut chunks = Vec::new();
        let mut char_start_idx = 0;

        while char_start_idx < char_indices.len() {
            let char_end_idx = (char_start_idx + self.chunk_size).min(char_indices.len());

            let byte_start = char_indices[char_start_idx].0;
            let byte_end = if char_end_idx < char_indices.len() {
                char_indices[char_end_idx].0
            } else {
                text.len()
            };

            let window = &text[byte_start..byte_end];
            if !window.trim().is_empty() {
                chunks.push(window.to_string());
            }

            char_start_idx += step;
        }

        chunks
    }
}
