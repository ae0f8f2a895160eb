//! Error types for the ragctx retrieval pipeline.
//!
//! The core stages (chunking, indexing, scoring, fusion, packing)
//! recover locally and never return errors. Only the boundaries do:
//! configuration loading, the file source root and the LLM transport.

use thiserror::Error;

/// Result type alias for ragctx operations
pub type Result<T> = std::result::Result<T, RagError>;

/// Main error type for ragctx
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("LLM request failed: {0}")]
    Llm(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl RagError {
    /// Shorthand for an [`RagError::InvalidParameter`]
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        RagError::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this error comes from configuration or tunables
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            RagError::ConfigError(_) | RagError::InvalidParameter { .. } | RagError::TomlError(_)
        )
    }

    /// Check if this error comes from the LLM collaborator
    pub fn is_llm_error(&self) -> bool {
        matches!(self, RagError::Llm(_))
    }
}

impl From<reqwest::Error> for RagError {
    fn from(err: reqwest::Error) -> Self {
        RagError::Llm(err.to_string())
    }
}
