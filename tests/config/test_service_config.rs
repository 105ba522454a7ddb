// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Layered configuration: defaults, TOML file, environment, CLI

use clap::Parser;
use embedder_service::cli::Cli;
use embedder_service::config::{EmbeddingBackend, LogFormat, ServiceConfig};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults_match_service_contract() {
    let config = ServiceConfig::default();

    assert_eq!(config.server.port, 8000);
    assert_eq!(config.embedding.model_name, "all-MiniLM-L6-v2");
    assert_eq!(config.embedding.dimension, 384);
    assert_eq!(config.embedding.batch_size, 32);
    assert!(config.validate().is_ok());
}

#[test]
fn test_file_then_env_then_cli() {
    let file = write_config(
        r#"
[server]
port = 9000
host = "127.0.0.1"

[embedding]
backend = "hash"
batch_size = 8

[logging]
format = "json"
"#,
    );

    let mut config = ServiceConfig::from_file(file.path()).unwrap();
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.embedding.backend, EmbeddingBackend::Hash);
    assert_eq!(config.logging.format, LogFormat::Json);

    let env: HashMap<&str, &str> =
        HashMap::from([("EMBEDDER_PORT", "9100"), ("EMBEDDER_BATCH_SIZE", "16")]);
    config
        .apply_env_with(|key| env.get(key).map(|v| v.to_string()))
        .unwrap();
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.embedding.batch_size, 16);
    assert_eq!(config.server.host, "127.0.0.1");

    let cli = Cli::try_parse_from(["embedder-service", "--port", "9200"]).unwrap();
    cli.apply_overrides(&mut config);
    assert_eq!(config.server.port, 9200);
    assert_eq!(config.embedding.batch_size, 16);
}

#[test]
fn test_invalid_file_reports_path() {
    let file = write_config("[server]\nport = \"not a number\"\n");

    let err = ServiceConfig::from_file(file.path()).unwrap_err();

    assert!(format!("{:#}", err).contains(&file.path().display().to_string()));
}

#[test]
fn test_zero_batch_size_fails_validation() {
    let mut config = ServiceConfig::default();
    config.embedding.batch_size = 0;

    assert!(config.validate().is_err());
}

#[test]
fn test_unparsable_env_value_stops_startup() {
    let env: HashMap<&str, &str> = HashMap::from([("EMBEDDER_PORT", "abc")]);
    let mut config = ServiceConfig::default();

    let err = config
        .apply_env_with(|key| env.get(key).map(|v| v.to_string()))
        .unwrap_err();

    assert!(err.to_string().contains("EMBEDDER_PORT"), "{}", err);
    assert_eq!(config.server.port, 8000);
}
