//! Configuration management for ragctx.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.
//! Values are validated once here so the retrieval core can assume
//! normalized inputs.

use crate::core::error::{RagError, Result};
use crate::core::search::StopWords;
use crate::core::xdg::XdgDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub indexing: IndexingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Indexing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexingConfig {
    /// Characters per chunk (not bytes!)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Character overlap between consecutive chunks
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Maximum file size in MB (skip larger files)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,

    /// File patterns to include (glob syntax)
    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    /// File patterns to exclude (glob syntax)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

/// Retrieval and ranking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetrievalConfig {
    /// Hits handed to the generator after fusion and rerank
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Candidates scored per query variant before fusion
    #[serde(default = "default_recall_k")]
    pub recall_k: usize,

    /// Candidates passed to the reranker
    #[serde(default = "default_rerank_candidates")]
    pub rerank_candidates: usize,

    /// Base character budget; the context budget defaults to twice this
    #[serde(default = "default_read_chars")]
    pub read_chars: usize,

    /// Explicit character budget of the packed context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_chars: Option<usize>,

    /// Upper bound on primary query + variants
    #[serde(default = "default_max_queries")]
    pub max_queries: usize,

    /// Tokens dropped during tokenization
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,
}

/// LLM collaborator configuration (routing and reranking)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// OpenAI-compatible API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model name sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Bearer token, only ever read from the environment or a file
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Rerank fused candidates with the LLM
    #[serde(default = "default_true")]
    pub enable_rerank: bool,

    /// Classify the task and rewrite it into query variants
    #[serde(default = "default_true")]
    pub enable_routing: bool,

    /// Characters of chunk text shown to the reranker
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_sec: u64,
}

// Default value functions
fn default_chunk_size() -> usize {
    800
}

fn default_overlap() -> usize {
    120
}

fn default_max_file_size() -> usize {
    10
}

fn default_top_k() -> usize {
    8
}

fn default_recall_k() -> usize {
    40
}

fn default_rerank_candidates() -> usize {
    20
}

fn default_read_chars() -> usize {
    4000
}

fn default_max_queries() -> usize {
    4
}

fn default_base_url() -> String {
    "https://dashscope.aliyuncs.com/compatible-mode/v1".to_string()
}

fn default_model() -> String {
    "qwen3-coder-plus".to_string()
}

fn default_true() -> bool {
    true
}

fn default_snippet_chars() -> usize {
    260
}

fn default_timeout() -> u64 {
    60
}

fn default_stop_words() -> Vec<String> {
    StopWords::DEFAULT.iter().map(|w| w.to_string()).collect()
}

fn default_include_patterns() -> Vec<String> {
    vec![
        "*.js".to_string(),
        "*.ts".to_string(),
        "*.tsx".to_string(),
        "*.json".to_string(),
        "*.md".to_string(),
        "*.txt".to_string(),
        "*.rs".to_string(),
        "*.toml".to_string(),
        "*.py".to_string(),
        "*.go".to_string(),
        "*.java".to_string(),
        "*.c".to_string(),
        "*.h".to_string(),
        "*.cpp".to_string(),
    ]
}

fn default_exclude_patterns() -> Vec<String> {
    vec![
        "**/node_modules/**".to_string(),
        "**/.git/**".to_string(),
        "**/dist/**".to_string(),
        "**/build/**".to_string(),
        "**/target/**".to_string(),
    ]
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
            max_file_size_mb: default_max_file_size(),
            include_patterns: default_include_patterns(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            recall_k: default_recall_k(),
            rerank_candidates: default_rerank_candidates(),
            read_chars: default_read_chars(),
            context_chars: None,
            max_queries: default_max_queries(),
            stop_words: default_stop_words(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            enable_rerank: default_true(),
            enable_routing: default_true(),
            snippet_chars: default_snippet_chars(),
            timeout_sec: default_timeout(),
        }
    }
}

impl RetrievalConfig {
    /// Packed-context budget: the explicit `context_chars`, else twice `read_chars`
    pub fn context_budget(&self) -> usize {
        self.context_chars
            .unwrap_or_else(|| self.read_chars.saturating_mul(2))
    }
}

impl LlmConfig {
    /// True when both an endpoint and a key are available
    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty()
            && self
                .api_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty())
    }
}

/// Per-call tunables threaded through every retrieval stage
#[derive(Debug, Clone)]
pub struct RetrievalParams {
    pub chunk_size: usize,
    pub overlap: usize,
    pub top_k: usize,
    pub recall_k: usize,
    pub rerank_candidates: usize,
    pub max_context_chars: usize,
    pub max_queries: usize,
    pub stop_words: StopWords,
}

impl Default for RetrievalParams {
    fn default() -> Self {
        Config::default().retrieval_params()
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| RagError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load config with priority: env vars > TOML > defaults
    pub fn load() -> Result<Self> {
        let xdg = XdgDirs::new();
        Self::load_with_xdg(&xdg)
    }

    /// Load config with explicit XDG directories
    ///
    /// Priority order:
    /// 1. RAGCTX_CONFIG env var
    /// 2. XDG config file (~/.config/ragctx/config.toml)
    /// 3. ./ragctx.toml
    /// 4. Defaults
    pub fn load_with_xdg(xdg: &XdgDirs) -> Result<Self> {
        xdg.log_paths();

        let mut config = if let Ok(config_path) = env::var("RAGCTX_CONFIG") {
            Self::from_file(config_path)?
        } else {
            let xdg_config = xdg.config_file();
            if xdg_config.exists() {
                Self::from_file(xdg_config)?
            } else if Path::new("ragctx.toml").exists() {
                Self::from_file("ragctx.toml")?
            } else {
                Self::default()
            }
        };

        config.merge_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Merge configuration with environment variables
    ///
    /// Unlike a missing variable, a present but unparsable one is an
    /// error naming the variable.
    pub fn merge_env(&mut self) -> Result<()> {
        // Indexing configuration
        if let Some(size) = env_parse("RAGCTX_CHUNK_SIZE")? {
            self.indexing.chunk_size = size;
        }
        if let Some(overlap) = env_parse("RAGCTX_CHUNK_OVERLAP")? {
            self.indexing.overlap = overlap;
        }
        if let Some(size) = env_parse("RAGCTX_MAX_FILE_SIZE_MB")? {
            self.indexing.max_file_size_mb = size;
        }

        // Retrieval configuration
        if let Some(k) = env_parse("RAGCTX_TOP_K")? {
            self.retrieval.top_k = k;
        }
        if let Some(k) = env_parse("RAGCTX_RECALL_K")? {
            self.retrieval.recall_k = k;
        }
        if let Some(n) = env_parse("RAGCTX_RERANK_CANDIDATES")? {
            self.retrieval.rerank_candidates = n;
        }
        if let Some(chars) = env_parse("RAGCTX_READ_CHARS")? {
            self.retrieval.read_chars = chars;
        }
        if let Some(chars) = env_parse("RAGCTX_CONTEXT_CHARS")? {
            self.retrieval.context_chars = Some(chars);
        }

        // LLM configuration
        if let Ok(flag) = env::var("RAGCTX_ENABLE_RERANK") {
            self.llm.enable_rerank = flag.trim() != "0";
        }
        if let Ok(url) = env::var("LLM_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Ok(key) = env::var("LLM_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Ok(model) = env::var("LLM_MODEL") {
            self.llm.model = model;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let non_zero = [
            ("chunk_size", self.indexing.chunk_size),
            ("top_k", self.retrieval.top_k),
            ("recall_k", self.retrieval.recall_k),
            ("rerank_candidates", self.retrieval.rerank_candidates),
            ("context_chars", self.retrieval.context_budget()),
            ("max_queries", self.retrieval.max_queries),
            ("snippet_chars", self.llm.snippet_chars),
        ];

        for (name, value) in non_zero {
            if value == 0 {
                return Err(RagError::invalid_parameter(name, "must be non-zero"));
            }
        }

        if self.llm.timeout_sec == 0 {
            return Err(RagError::invalid_parameter(
                "timeout_sec",
                "must be non-zero",
            ));
        }

        Ok(())
    }

    /// Build the tunables for one retrieval call
    pub fn retrieval_params(&self) -> RetrievalParams {
        RetrievalParams {
            chunk_size: self.indexing.chunk_size,
            overlap: self.indexing.overlap,
            top_k: self.retrieval.top_k,
            recall_k: self.retrieval.recall_k,
            rerank_candidates: self.retrieval.rerank_candidates,
            max_context_chars: self.retrieval.context_budget(),
            max_queries: self.retrieval.max_queries,
            stop_words: StopWords::new(self.retrieval.stop_words.iter().cloned()),
        }
    }

    /// Log configuration (redacting sensitive values)
    pub fn log_config(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Chunk size: {} chars", self.indexing.chunk_size);
        tracing::info!("  Overlap: {} chars", self.indexing.overlap);
        tracing::info!("  Max file size: {} MB", self.indexing.max_file_size_mb);
        tracing::info!(
            "  Include patterns: {} patterns",
            self.indexing.include_patterns.len()
        );
        tracing::info!(
            "  Exclude patterns: {} patterns",
            self.indexing.exclude_patterns.len()
        );
        tracing::info!("  Top k: {}", self.retrieval.top_k);
        tracing::info!("  Recall k: {}", self.retrieval.recall_k);
        tracing::info!("  Rerank candidates: {}", self.retrieval.rerank_candidates);
        tracing::info!(
            "  Context budget: {} chars",
            self.retrieval.context_budget()
        );
        tracing::info!("  Stop words: {}", self.retrieval.stop_words.len());
        tracing::info!("  LLM endpoint: {}", self.llm.base_url);
        tracing::info!("  LLM model: {}", self.llm.model);
        tracing::info!(
            "  LLM key: {}",
            if self.llm.api_key.is_some() {
                "<set>"
            } else {
                "<unset>"
            }
        );
        tracing::info!("  Rerank enabled: {}", self.llm.enable_rerank);
        tracing::info!("  Routing enabled: {}", self.llm.enable_routing);
    }
}

/// Parse an optional environment variable, naming it on failure
fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            RagError::invalid_parameter(name, format!("expected a non-negative integer, got '{raw}'"))
        }),
        Err(_) => Ok(None),
    }
}
