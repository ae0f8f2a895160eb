//! Core domain logic (protocol-agnostic)
//!
//! This module contains the retrieval pipeline, independent of the
//! command-line adapter.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **indexer**: File walking, chunking and chunk records
//! - **search**: Tokenizer, BM25 index and multi-query fusion
//! - **context**: Packing ranked hits into a bounded context
//! - **routing**: Task modes and query routing
//! - **rerank**: Second-stage reranking contract
//! - **llm**: OpenAI-compatible client, router and reranker
//! - **retrieval**: End-to-end orchestration
//! - **services**: Unified service container

pub mod config;
pub mod context;
pub mod error;
pub mod indexer;
pub mod llm;
pub mod rerank;
pub mod retrieval;
pub mod routing;
pub mod search;
pub mod services;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{RagError, Result};
pub use retrieval::Retriever;
pub use services::Services;
