// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;
use std::path::PathBuf;

use crate::config::{EmbeddingBackend, ServiceConfig};

/// Sentence embedding service
#[derive(Parser, Debug, Default)]
#[command(name = "embedder-service")]
#[command(version)]
#[command(about = "HTTP service that embeds text chunks with a sentence-transformer", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, short, env = "EMBEDDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Embedding backend (onnx or hash)
    #[arg(long)]
    pub backend: Option<EmbeddingBackend>,

    /// Directory holding the ONNX model and tokenizer
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Log level filter, e.g. "info" or "embedder_service=debug"
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    /// Applies flags that were given on top of `config`.
    pub fn apply_overrides(&self, config: &mut ServiceConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(backend) = self.backend {
            config.embedding.backend = backend;
        }
        if let Some(model_dir) = &self.model_dir {
            config.embedding.model_dir = Some(model_dir.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}
