//! Document indexing module.
//!
//! Turns a project into chunk records:
//!
//! - UTF-8 safe character-based sliding-window chunking
//! - File system walking with glob filtering (the file source)
//! - Per-file read with skip-on-failure and stable chunk ids

pub mod chunker;
pub mod pipeline;
pub mod walker;

pub use chunker::Chunker;
pub use pipeline::{FileOutcome, FileStatus, IndexOutcome, IndexingPipeline};
pub use walker::FileWalker;
