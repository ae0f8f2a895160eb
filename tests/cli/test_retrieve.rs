//! Tests for retrieve CLI command
//!
//! Tests the retrieve command handler with various scenarios:
//! - Hits in human and JSON output
//! - Context-only and files-only output
//! - Invalid paths, patterns and overrides

use crate::cli::test_helpers::{create_cli_test_services, create_test_repo, retrieve_args};
use ragctx::cli::commands::retrieve::execute;
use ragctx::cli::OutputFormat;

fn sample_repo() -> tempfile::TempDir {
    create_test_repo(&[
        ("src/main.rs", "fn main() { println!(\"hello\"); }"),
        ("src/lib.rs", "pub fn helper() { println!(\"world\"); }"),
        ("README.md", "# Sample\n\nHelper utilities."),
    ])
}

/// Test retrieve with matching task in human format
#[tokio::test]
async fn test_retrieve_human() {
    let services = create_cli_test_services();
    let repo = sample_repo();

    let result = execute(
        retrieve_args(repo.path(), "where is helper defined"),
        &services,
        OutputFormat::Human,
    )
    .await;
    assert!(result.is_ok(), "Retrieve should succeed: {:?}", result.err());
}

/// Test retrieve in JSON format with a variant
#[tokio::test]
async fn test_retrieve_json_with_variant() {
    let services = create_cli_test_services();
    let repo = sample_repo();

    let mut args = retrieve_args(repo.path(), "print greeting");
    args.variants = vec!["println hello".to_string()];
    args.top_k = Some(2);

    let result = execute(args, &services, OutputFormat::Json).await;
    assert!(result.is_ok(), "Retrieve should succeed: {:?}", result.err());
}

/// Test context-only and files-only output modes
#[tokio::test]
async fn test_retrieve_output_modes() {
    let services = create_cli_test_services();
    let repo = sample_repo();

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let mut args = retrieve_args(repo.path(), "helper");
        args.context_only = true;
        assert!(execute(args, &services, format).await.is_ok());

        let mut args = retrieve_args(repo.path(), "helper");
        args.files_only = true;
        assert!(execute(args, &services, format).await.is_ok());
    }
}

/// Test retrieve over a project with no matching files
#[tokio::test]
async fn test_retrieve_no_files() {
    let services = create_cli_test_services();
    let repo = create_test_repo(&[("image.png", "not really an image")]);

    let result = execute(
        retrieve_args(repo.path(), "anything"),
        &services,
        OutputFormat::Human,
    )
    .await;
    assert!(result.is_ok());
}

/// Test include/exclude patterns
#[tokio::test]
async fn test_retrieve_with_patterns() {
    let services = create_cli_test_services();
    let repo = sample_repo();

    let mut args = retrieve_args(repo.path(), "helper");
    args.include = vec!["*.md".to_string()];
    args.exclude = vec!["**/src/**".to_string()];

    let result = execute(args, &services, OutputFormat::Json).await;
    assert!(result.is_ok());
}

/// Test retrieve with a nonexistent path
#[tokio::test]
async fn test_retrieve_missing_path() {
    let services = create_cli_test_services();

    let result = execute(
        retrieve_args(std::path::Path::new("/nonexistent/ragctx/project"), "helper"),
        &services,
        OutputFormat::Human,
    )
    .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("path does not exist"));
}

/// Test retrieve with an invalid glob pattern
#[tokio::test]
async fn test_retrieve_invalid_pattern() {
    let services = create_cli_test_services();
    let repo = sample_repo();

    let mut args = retrieve_args(repo.path(), "helper");
    args.include = vec!["[unclosed".to_string()];

    let result = execute(args, &services, OutputFormat::Human).await;
    assert!(result.is_err());
}

/// Test zero overrides are rejected
#[tokio::test]
async fn test_retrieve_zero_top_k() {
    let services = create_cli_test_services();
    let repo = sample_repo();

    let mut args = retrieve_args(repo.path(), "helper");
    args.top_k = Some(0);

    let err = execute(args, &services, OutputFormat::Json)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("top_k"));
}

/// Test a blank task is rejected
#[tokio::test]
async fn test_retrieve_blank_task() {
    let services = create_cli_test_services();
    let repo = sample_repo();

    let mut args = retrieve_args(repo.path(), "x");
    args.task = vec!["   ".to_string()];

    let result = execute(args, &services, OutputFormat::Human).await;
    assert!(result.is_err());
}
