//! ragctx - Lexical retrieval context builder for code repositories
//!
//! Chunks a project, ranks chunks against a task with BM25 over several
//! query variants, optionally reranks them with an LLM, and packs the
//! best ones into a bounded context string.
//!
//! # Architecture
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types, xdg
//!   - indexer (file walking, chunking)
//!   - search (tokenizer, BM25, fusion)
//!   - context (packing)
//!   - routing, rerank, llm (optional collaborators)
//!   - retrieval (orchestration), services
//!
//! - **cli**: clap adapter (depends on core)
//!
//! # Key Features
//!
//! - UTF-8 safe chunking (character-based, never panics)
//! - In-memory BM25 with multi-query fusion and path boosting
//! - Deterministic ranking for identical inputs
//! - Best-effort LLM routing and reranking with explicit fallbacks

// Core domain logic (protocol-agnostic)
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{RagError, Result};
pub use core::retrieval::Retriever;
pub use core::types::*;
