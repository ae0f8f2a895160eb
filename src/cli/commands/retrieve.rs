//! Retrieve command - build a ranked context for a task

use crate::cli::output::{colors, format_duration, format_hit_scores, print_warning};
use crate::cli::OutputFormat;
use crate::core::retrieval::{ContextBundle, ContextRequest};
use crate::core::services::{RetrievalOverrides, Services};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the retrieve command
#[derive(Args, Debug)]
pub struct RetrieveArgs {
    /// Path to the project directory
    pub path: PathBuf,

    /// Task description (remaining words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub task: Vec<String>,

    /// Extra query variant (can be specified multiple times)
    #[arg(long = "variant", short = 'q')]
    pub variants: Vec<String>,

    /// Number of hits to keep
    #[arg(long, short = 'k')]
    pub top_k: Option<usize>,

    /// Candidates considered per query before fusion
    #[arg(long)]
    pub recall_k: Option<usize>,

    /// Character budget of the packed context
    #[arg(long)]
    pub max_chars: Option<usize>,

    /// Skip LLM routing and reranking
    #[arg(long)]
    pub no_llm: bool,

    /// Only print the packed context
    #[arg(long, conflicts_with = "files_only")]
    pub context_only: bool,

    /// Only print the paths of the hits
    #[arg(long)]
    pub files_only: bool,

    /// Glob patterns to include (can be specified multiple times)
    #[arg(long, short = 'i')]
    pub include: Vec<String>,

    /// Glob patterns to exclude (can be specified multiple times)
    #[arg(long, short = 'e')]
    pub exclude: Vec<String>,
}

impl RetrieveArgs {
    pub fn task_text(&self) -> String {
        self.task.join(" ")
    }
}

/// Paths of the hits, in rank order and without duplicates
#[derive(Debug, Serialize)]
pub struct FilesOutput {
    pub files: Vec<String>,
}

/// Execute the retrieve command
pub async fn execute(
    args: RetrieveArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let task = args.task_text();
    if task.trim().is_empty() {
        return Err("Task cannot be empty".into());
    }

    let walker = services.create_walker(args.include.clone(), args.exclude.clone())?;
    let files = walker.collect_files(&args.path)?;
    tracing::debug!("Collected {} files under {:?}", files.len(), args.path);

    let retriever = services.create_retriever(&RetrievalOverrides {
        top_k: args.top_k,
        recall_k: args.recall_k,
        max_context_chars: args.max_chars,
    })?;
    let assist = services.create_assist(!args.no_llm)?;

    let request = ContextRequest {
        root: args.path.clone(),
        files,
        task,
        variants: args.variants.clone(),
    };
    let bundle = retriever.run(&request, &assist).await;

    match format {
        OutputFormat::Human => print_human(&args, &bundle),
        OutputFormat::Json => print_json(&args, &bundle)?,
    }

    Ok(())
}

fn unique_files(bundle: &ContextBundle) -> Vec<String> {
    let mut files: Vec<String> = Vec::new();
    for hit in &bundle.hits {
        if !files.contains(&hit.rel_path) {
            files.push(hit.rel_path.clone());
        }
    }
    files
}

fn print_json(args: &RetrieveArgs, bundle: &ContextBundle) -> Result<(), serde_json::Error> {
    let json = if args.files_only {
        serde_json::to_string_pretty(&FilesOutput {
            files: unique_files(bundle),
        })?
    } else if args.context_only {
        serde_json::to_string_pretty(&serde_json::json!({ "context": bundle.context }))?
    } else {
        serde_json::to_string_pretty(bundle)?
    };
    println!("{json}");
    Ok(())
}

fn print_human(args: &RetrieveArgs, bundle: &ContextBundle) {
    if args.files_only {
        for file in unique_files(bundle) {
            println!("{}", colors::file_path(&file));
        }
        return;
    }

    if args.context_only {
        print!("{}", bundle.context);
        return;
    }

    println!(
        "{} {}",
        colors::label("Mode:"),
        colors::mode(bundle.mode.as_str())
    );
    println!(
        "{} {}",
        colors::label("Queries:"),
        bundle.queries.join(" | ")
    );
    println!(
        "{} {} files, {} chunks, {} skipped ({})\n",
        colors::label("Indexed:"),
        colors::number(&bundle.stats.index.files_indexed.to_string()),
        colors::number(&bundle.stats.index.chunks_created.to_string()),
        colors::number(&bundle.stats.index.files_skipped.to_string()),
        format_duration(bundle.stats.total_ms as f64 / 1000.0)
    );

    if bundle.stats.index.files_skipped > 0 {
        print_warning(&format!(
            "{} file(s) could not be read (use --verbose for details)",
            bundle.stats.index.files_skipped
        ));
    }

    if bundle.hits.is_empty() {
        println!("No hits found");
        return;
    }

    println!(
        "Found {} hit(s):\n",
        colors::number(&bundle.hits.len().to_string())
    );
    for (i, hit) in bundle.hits.iter().enumerate() {
        println!(
            "[{}] {} {}",
            colors::rank(&(i + 1).to_string()),
            colors::file_path(&format!("{}#{}", hit.rel_path, hit.id)),
            colors::dim(&format_hit_scores(hit))
        );
    }

    println!("\n{}", colors::label("Context:"));
    print!("{}", bundle.context);
}
