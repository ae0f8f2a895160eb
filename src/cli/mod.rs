//! CLI adapter for ragctx
//!
//! Provides the command-line interface over the retrieval pipeline.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |     core/        |
//! |  (domain logic)  |
//! +--------+---------+
//!          |
//!          v
//! +------------------+
//! |      cli/        |
//! | (clap adapter)   |
//! +------------------+
//! ```

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// ragctx - Lexical retrieval context builder
///
/// Ranks the chunks of a project against a task with BM25 over several
/// query variants, optionally reranks them with an LLM, and prints the
/// best chunks packed into a bounded context.
#[derive(Parser, Debug)]
#[command(name = "ragctx")]
#[command(author = "RHOBIMD HEALTH")]
#[command(version)]
#[command(about = "Retrieval context builder for code repositories", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank project chunks for a task and print the packed context
    Retrieve(commands::RetrieveArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  ragctx completions bash > ~/.local/share/bash-completion/completions/ragctx
    ///   zsh:   ragctx completions zsh > ~/.zfunc/_ragctx
    ///   fish:  ragctx completions fish > ~/.config/fish/completions/ragctx.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;
    use std::sync::Arc;

    let command = match cli.command {
        // Completions don't need configuration
        Commands::Completions(args) => return commands::completions::execute(args),
        other => other,
    };

    let xdg = XdgDirs::new();
    let config = Config::load_with_xdg(&xdg)?;
    config.log_config();

    let services = Arc::new(Services::new(config));

    match command {
        Commands::Retrieve(args) => commands::retrieve::execute(args, &services, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &services, cli.format).await,
        Commands::Completions(_) => Ok(()),
    }
}
