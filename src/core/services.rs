//! Unified service container for ragctx
//!
//! Holds the effective configuration and builds the per-call pieces
//! (file walker, retriever, LLM collaborators) from it.

use crate::core::config::Config;
use crate::core::error::{RagError, Result};
use crate::core::indexer::FileWalker;
use crate::core::retrieval::{Assist, Retriever};
use std::sync::Arc;

/// Per-invocation overrides of the configured tunables
#[derive(Debug, Clone, Default)]
pub struct RetrievalOverrides {
    pub top_k: Option<usize>,
    pub recall_k: Option<usize>,
    pub max_context_chars: Option<usize>,
}

/// Unified services container
#[derive(Clone)]
pub struct Services {
    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Create a FileWalker with request-specific patterns
    ///
    /// Empty pattern lists fall back to the configured defaults.
    pub fn create_walker(
        &self,
        include_patterns: Vec<String>,
        exclude_patterns: Vec<String>,
    ) -> Result<FileWalker> {
        let include = if include_patterns.is_empty() {
            self.config.indexing.include_patterns.clone()
        } else {
            include_patterns
        };
        let exclude = if exclude_patterns.is_empty() {
            self.config.indexing.exclude_patterns.clone()
        } else {
            exclude_patterns
        };

        FileWalker::new(include, exclude, self.config.indexing.max_file_size_mb)
    }

    /// Create a Retriever with the configured tunables plus `overrides`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if an override is zero.
    pub fn create_retriever(&self, overrides: &RetrievalOverrides) -> Result<Retriever> {
        let mut params = self.config.retrieval_params();

        if let Some(top_k) = overrides.top_k {
            params.top_k = non_zero("top_k", top_k)?;
        }
        if let Some(recall_k) = overrides.recall_k {
            params.recall_k = non_zero("recall_k", recall_k)?;
        }
        if let Some(max_chars) = overrides.max_context_chars {
            params.max_context_chars = non_zero("max_chars", max_chars)?;
        }

        Ok(Retriever::new(params))
    }

    /// LLM collaborators, or none when `use_llm` is false
    pub fn create_assist(&self, use_llm: bool) -> Result<Assist> {
        if use_llm {
            Assist::from_config(&self.config.llm)
        } else {
            Ok(Assist {
                snippet_chars: self.config.llm.snippet_chars,
                ..Assist::none()
            })
        }
    }
}

fn non_zero(name: &str, value: usize) -> Result<usize> {
    if value == 0 {
        return Err(RagError::invalid_parameter(name, "must be greater than 0"));
    }
    Ok(value)
}
