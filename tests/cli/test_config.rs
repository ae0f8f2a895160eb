//! Tests for show-config CLI command and configuration loading

use crate::cli::test_helpers::create_cli_test_services;
use ragctx::cli::commands::config::{build_response, execute};
use ragctx::cli::commands::ConfigArgs;
use ragctx::cli::OutputFormat;
use ragctx::core::config::Config;
use ragctx::core::services::Services;
use ragctx::core::xdg::XdgDirs;
use serial_test::serial;
use std::env;

/// Test show-config in both formats
#[tokio::test]
async fn test_show_config_formats() {
    let services = create_cli_test_services();

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let result = execute(ConfigArgs { all: true }, &services, format).await;
        assert!(result.is_ok(), "show-config should succeed: {:?}", result.err());
    }
}

/// Test that lists only appear with --all
#[test]
fn test_response_lists_only_with_all() {
    let services = create_cli_test_services();

    let short = build_response(&ConfigArgs { all: false }, &services);
    assert!(short.indexing.include_patterns.is_none());
    assert!(short.retrieval.stop_words.is_none());

    let full = build_response(&ConfigArgs { all: true }, &services);
    assert!(full
        .indexing
        .include_patterns
        .as_ref()
        .unwrap()
        .contains(&"*.ts".to_string()));
    assert_eq!(full.retrieval.stop_words.as_ref().unwrap().len(), 17);
}

/// Test the API key is reported but never printed
#[test]
fn test_response_hides_api_key() {
    let mut config = Config::default();
    config.llm.api_key = Some("sk-secret".to_string());
    let services = Services::new(config);

    let response = build_response(&ConfigArgs { all: true }, &services);
    assert!(response.llm.api_key_set);

    let json = serde_json::to_string(&response).unwrap();
    assert!(!json.contains("sk-secret"));
}

/// Test loading a TOML file named by RAGCTX_CONFIG, with env on top
#[test]
#[serial]
fn test_load_config_file_then_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ragctx.toml");
    std::fs::write(
        &path,
        r#"
[indexing]
chunk_size = 400
overlap = 40

[retrieval]
top_k = 5

[llm]
model = "local-coder"
enable_rerank = false
"#,
    )
    .unwrap();

    env::set_var("RAGCTX_CONFIG", &path);
    env::set_var("RAGCTX_TOP_K", "6");

    let config = Config::load_with_xdg(&XdgDirs::new());

    env::remove_var("RAGCTX_CONFIG");
    env::remove_var("RAGCTX_TOP_K");

    let config = config.unwrap();
    assert_eq!(config.indexing.chunk_size, 400);
    assert_eq!(config.indexing.overlap, 40);
    assert_eq!(config.retrieval.top_k, 6);
    assert_eq!(config.retrieval.recall_k, 40);
    assert_eq!(config.llm.model, "local-coder");
    assert!(!config.llm.enable_rerank);
    assert!(config.llm.enable_routing);
}

/// Test that an invalid value in the file fails validation
#[test]
#[serial]
fn test_load_config_rejects_zero_top_k() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ragctx.toml");
    std::fs::write(&path, "[retrieval]\ntop_k = 0\n").unwrap();

    env::set_var("RAGCTX_CONFIG", &path);
    let result = Config::load_with_xdg(&XdgDirs::new());
    env::remove_var("RAGCTX_CONFIG");

    let err = result.unwrap_err();
    assert!(err.message().contains("top_k"));
}

/// Test that a missing config file named by RAGCTX_CONFIG is an error
#[test]
#[serial]
fn test_load_config_missing_file() {
    env::set_var("RAGCTX_CONFIG", "/nonexistent/ragctx/config.toml");
    let result = Config::load_with_xdg(&XdgDirs::new());
    env::remove_var("RAGCTX_CONFIG");

    assert!(result.unwrap_err().is_config_error());
}
