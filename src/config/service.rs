// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Service configuration.
//!
//! Precedence, lowest first: built-in defaults, TOML file, `EMBEDDER_*`
//! environment variables, then CLI flags (applied by `cli`).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Model served when `embedding.model_name` is not set.
pub const DEFAULT_MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Which encoder implementation backs the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// ONNX Runtime sentence-transformer
    Onnx,
    /// Deterministic hash vectors, no model files needed
    Hash,
}

impl FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "onnx" => Ok(EmbeddingBackend::Onnx),
            "hash" => Ok(EmbeddingBackend::Hash),
            other => Err(format!(
                "unknown embedding backend '{}' (expected 'onnx' or 'hash')",
                other
            )),
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbeddingBackend::Onnx => write!(f, "onnx"),
            EmbeddingBackend::Hash => write!(f, "hash"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!(
                "unknown log format '{}' (expected 'pretty' or 'json')",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_body_bytes: 16 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    pub model_name: String,
    /// HuggingFace hub repository used when files are not available locally
    pub model_repo: String,
    /// Local directory holding `model_file` and `tokenizer_file`
    pub model_dir: Option<PathBuf>,
    pub model_file: String,
    pub tokenizer_file: String,
    /// Hub download cache; hf-hub default when unset
    pub cache_dir: Option<PathBuf>,
    pub allow_download: bool,
    pub dimension: usize,
    pub max_seq_length: usize,
    /// Texts per backend call
    pub batch_size: usize,
    pub normalize: bool,
    pub use_gpu: bool,
    pub intra_threads: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Onnx,
            model_name: DEFAULT_MODEL_NAME.to_string(),
            model_repo: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            model_dir: None,
            model_file: "onnx/model.onnx".to_string(),
            tokenizer_file: "tokenizer.json".to_string(),
            cache_dir: None,
            allow_download: true,
            dimension: 384,
            max_seq_length: 256,
            batch_size: 32,
            normalize: true,
            use_gpu: false,
            intra_threads: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub embedding: EmbeddingConfig,
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Defaults, overlaid with `path` if given, then with the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay `EMBEDDER_*` environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay variables from `lookup`.
    ///
    /// Runs before logging is installed, so an unparsable value is an error
    /// naming the variable rather than a warning.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("EMBEDDER_HOST") {
            self.server.host = val;
        }
        if let Some(port) = parse_var(&lookup, "EMBEDDER_PORT")? {
            self.server.port = port;
        }
        if let Some(backend) = parse_var(&lookup, "EMBEDDER_BACKEND")? {
            self.embedding.backend = backend;
        }
        if let Some(val) = lookup("EMBEDDER_MODEL_DIR") {
            self.embedding.model_dir = Some(PathBuf::from(val));
        }
        if let Some(val) = lookup("EMBEDDER_MODEL_REPO") {
            self.embedding.model_repo = val;
        }
        if let Some(val) = lookup("EMBEDDER_CACHE_DIR") {
            self.embedding.cache_dir = Some(PathBuf::from(val));
        }
        if let Some(allow) = parse_bool_var(&lookup, "EMBEDDER_ALLOW_DOWNLOAD")? {
            self.embedding.allow_download = allow;
        }
        if let Some(batch_size) = parse_var(&lookup, "EMBEDDER_BATCH_SIZE")? {
            self.embedding.batch_size = batch_size;
        }
        if let Some(use_gpu) = parse_bool_var(&lookup, "EMBEDDER_USE_GPU")? {
            self.embedding.use_gpu = use_gpu;
        }
        if let Some(val) = lookup("EMBEDDER_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(format) = parse_var(&lookup, "EMBEDDER_LOG_FORMAT")? {
            self.logging.format = format;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("server.port must be greater than 0");
        }
        if self.server.max_body_bytes == 0 {
            anyhow::bail!("server.max_body_bytes must be greater than 0");
        }
        if self.embedding.dimension == 0 {
            anyhow::bail!("Embedding dimension must be greater than 0");
        }
        if self.embedding.batch_size == 0 {
            anyhow::bail!("Batch size must be greater than 0");
        }
        if self.embedding.max_seq_length == 0 {
            anyhow::bail!("embedding.max_seq_length must be greater than 0");
        }
        if self.embedding.model_name.trim().is_empty() {
            anyhow::bail!("embedding.model_name cannot be empty");
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.parse()
        .map(Some)
        .map_err(|e| anyhow::anyhow!("Invalid {}={:?}: {}", key, raw, e))
}

fn parse_bool_var<F>(lookup: &F, key: &str) -> Result<Option<bool>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => anyhow::bail!("Invalid {}={:?}: expected a boolean", key, raw),
    }
}
