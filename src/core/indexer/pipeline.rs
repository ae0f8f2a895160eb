//! Document indexing: files in, chunk records out.
//!
//! Each file is read, chunked and tagged with its project-relative
//! path. Ids are assigned from 0 across the whole run in
//! file-then-chunk order. A file that cannot be read is recorded as
//! skipped and never aborts the batch.

use std::fs;
use std::path::{Component, Path};
use std::time::Instant;

use serde::Serialize;

use crate::core::indexer::Chunker;
use crate::core::types::{ChunkRecord, IndexStats};

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Indexed { chunks: usize },
    Skipped { reason: String },
}

/// Per-file indexing result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileOutcome {
    pub rel_path: String,
    #[serde(flatten)]
    pub status: FileStatus,
}

/// Result of indexing a file list
#[derive(Debug, Clone, Default)]
pub struct IndexOutcome {
    pub chunks: Vec<ChunkRecord>,
    pub files: Vec<FileOutcome>,
    pub duration_ms: u64,
}

impl IndexOutcome {
    /// Files that could not be read
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().filter_map(|f| match &f.status {
            FileStatus::Skipped { reason } => Some((f.rel_path.as_str(), reason.as_str())),
            FileStatus::Indexed { .. } => None,
        })
    }

    /// Summary counters
    pub fn stats(&self) -> IndexStats {
        let files_skipped = self.skipped().count();
        IndexStats {
            files_indexed: self.files.len() - files_skipped,
            files_skipped,
            chunks_created: self.chunks.len(),
            duration_ms: self.duration_ms,
        }
    }
}

/// Turns an ordered file list into chunk records
#[derive(Debug, Clone)]
pub struct IndexingPipeline {
    chunker: Chunker,
}

impl IndexingPipeline {
    /// Create a new indexing pipeline
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunker: Chunker::new(chunk_size, overlap),
        }
    }

    /// Index `files` (absolute or root-relative) in the given order
    pub fn index_files<P: AsRef<Path>>(&self, root: &Path, files: &[P]) -> IndexOutcome {
        let start = Instant::now();

        let mut chunks = Vec::new();
        let mut outcomes = Vec::with_capacity(files.len());
        let mut next_id: u64 = 0;

        for file in files {
            let path = file.as_ref();
            let rel_path = relative_path(root, path);

            let status = match read_source(root, path) {
                Ok(contents) => {
                    let parts = self.chunker.chunk_text(&contents);
                    let count = parts.len();
                    for text in parts {
                        chunks.push(ChunkRecord {
                            id: next_id,
                            rel_path: rel_path.clone(),
                            text,
                        });
                        next_id += 1;
                    }
                    tracing::debug!("Indexed {} ({} chunks)", rel_path, count);
                    FileStatus::Indexed { chunks: count }
                }
                Err(reason) => {
                    tracing::debug!("Skipped {}: {}", rel_path, reason);
                    FileStatus::Skipped { reason }
                }
            };

            outcomes.push(FileOutcome { rel_path, status });
        }

        IndexOutcome {
            chunks,
            files: outcomes,
            duration_ms: start.elapsed().as_millis() as u64,
        }
    }
}

fn read_source(root: &Path, path: &Path) -> std::result::Result<String, String> {
    let full = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    fs::read_to_string(&full).map_err(|e| {
        // InvalidData means the bytes were not UTF-8 (likely binary)
        if e.kind() == std::io::ErrorKind::InvalidData {
            "not valid UTF-8".to_string()
        } else {
            e.to_string()
        }
    })
}

/// Project-relative path with `/` separators
fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
