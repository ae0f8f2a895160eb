//! Config command - show current configuration

use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also list glob patterns and stop words
    #[arg(long, short = 'a')]
    pub all: bool,
}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub indexing: IndexingSummary,
    pub retrieval: RetrievalSummary,
    pub llm: LlmSummary,
}

#[derive(Debug, Serialize)]
pub struct IndexingSummary {
    pub chunk_size: usize,
    pub overlap: usize,
    pub max_file_size_mb: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_patterns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude_patterns: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct RetrievalSummary {
    pub top_k: usize,
    pub recall_k: usize,
    pub rerank_candidates: usize,
    pub read_chars: usize,
    pub context_chars: usize,
    pub max_queries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_words: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct LlmSummary {
    pub base_url: String,
    pub model: String,
    pub api_key_set: bool,
    pub enable_routing: bool,
    pub enable_rerank: bool,
}

/// Build the response from the effective configuration
pub fn build_response(args: &ConfigArgs, services: &Services) -> ConfigResponse {
    let config = &services.config;
    let xdg = crate::core::xdg::XdgDirs::new();
    let all = |v: &Vec<String>| if args.all { Some(v.clone()) } else { None };

    ConfigResponse {
        config_file: xdg.config_file().to_string_lossy().into_owned(),
        indexing: IndexingSummary {
            chunk_size: config.indexing.chunk_size,
            overlap: config.indexing.overlap,
            max_file_size_mb: config.indexing.max_file_size_mb,
            include_patterns: all(&config.indexing.include_patterns),
            exclude_patterns: all(&config.indexing.exclude_patterns),
        },
        retrieval: RetrievalSummary {
            top_k: config.retrieval.top_k,
            recall_k: config.retrieval.recall_k,
            rerank_candidates: config.retrieval.rerank_candidates,
            read_chars: config.retrieval.read_chars,
            context_chars: config.retrieval.context_budget(),
            max_queries: config.retrieval.max_queries,
            stop_words: all(&config.retrieval.stop_words),
        },
        llm: LlmSummary {
            base_url: config.llm.base_url.clone(),
            model: config.llm.model.clone(),
            api_key_set: config.llm.is_configured(),
            enable_routing: config.llm.enable_routing,
            enable_rerank: config.llm.enable_rerank,
        },
    }
}

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = build_response(&args, services);

    match format {
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  config_file: {}", response.config_file);
            println!("  indexing:");
            println!("    chunk_size: {}", response.indexing.chunk_size);
            println!("    overlap: {}", response.indexing.overlap);
            println!(
                "    max_file_size_mb: {}",
                response.indexing.max_file_size_mb
            );
            if let Some(include) = &response.indexing.include_patterns {
                println!("    include_patterns: {include:?}");
            }
            if let Some(exclude) = &response.indexing.exclude_patterns {
                println!("    exclude_patterns: {exclude:?}");
            }
            println!("  retrieval:");
            println!("    top_k: {}", response.retrieval.top_k);
            println!("    recall_k: {}", response.retrieval.recall_k);
            println!(
                "    rerank_candidates: {}",
                response.retrieval.rerank_candidates
            );
            println!("    read_chars: {}", response.retrieval.read_chars);
            println!("    context_chars: {}", response.retrieval.context_chars);
            println!("    max_queries: {}", response.retrieval.max_queries);
            if let Some(stop_words) = &response.retrieval.stop_words {
                println!("    stop_words: {stop_words:?}");
            }
            println!("  llm:");
            println!("    base_url: {}", response.llm.base_url);
            println!("    model: {}", response.llm.model);
            println!("    api_key_set: {}", response.llm.api_key_set);
            println!("    enable_routing: {}", response.llm.enable_routing);
            println!("    enable_rerank: {}", response.llm.enable_rerank);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
