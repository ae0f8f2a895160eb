//! ragctx CLI - build ranked retrieval context for a task
//!
//! # Examples
//!
//! ```bash
//! # Rank chunks of a project for a task (LLM assist when LLM_API_KEY is set)
//! ragctx retrieve /path/to/repo "fix the login bug"
//!
//! # Lexical only, with an extra query variant
//! ragctx retrieve /path/to/repo "fix the login bug" -q "session token" --no-llm
//!
//! # Only the packed context, for piping into another tool
//! ragctx retrieve /path/to/repo "summarize the scorer" --context-only
//!
//! # Show configuration
//! ragctx show-config
//! ```

use clap::Parser;
use ragctx::cli::output::print_error;
use ragctx::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "ragctx=warn";
const VERBOSE_FILTER: &str = "ragctx=debug";

fn init_logging(verbose: bool, json: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_env("RAGCTX_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    // stdout carries the command output
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
