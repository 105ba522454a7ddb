// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Locating the ONNX model and tokenizer files.
//!
//! A configured `model_dir` always wins. Without one, the files are fetched
//! from the HuggingFace hub (and cached) unless downloads are disabled.

use anyhow::{Context, Result};
use hf_hub::api::sync::ApiBuilder;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::EmbeddingConfig;

/// Paths of the two files an ONNX sentence-transformer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
}

impl ModelFiles {
    /// Files under a local model directory. Both must exist.
    pub fn from_dir(dir: &Path, model_file: &str, tokenizer_file: &str) -> Result<Self> {
        let files = Self {
            model_path: dir.join(model_file),
            tokenizer_path: dir.join(tokenizer_file),
        };

        if !files.model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", files.model_path.display());
        }
        if !files.tokenizer_path.exists() {
            anyhow::bail!(
                "Tokenizer file not found: {}",
                files.tokenizer_path.display()
            );
        }

        Ok(files)
    }
}

/// Resolves model files for `config`, downloading them if needed.
///
/// Blocking: hub downloads use a synchronous client, call from
/// `spawn_blocking` in async code.
pub fn resolve_model_files(config: &EmbeddingConfig) -> Result<ModelFiles> {
    if let Some(dir) = &config.model_dir {
        info!("Using local model directory {}", dir.display());
        return ModelFiles::from_dir(dir, &config.model_file, &config.tokenizer_file);
    }

    if !config.allow_download {
        anyhow::bail!(
            "No model directory configured and downloads are disabled; \
             set embedding.model_dir or enable embedding.allow_download"
        );
    }

    download_model_files(config)
}

fn download_model_files(config: &EmbeddingConfig) -> Result<ModelFiles> {
    info!(
        "Fetching {} and {} from {}",
        config.model_file, config.tokenizer_file, config.model_repo
    );

    let mut builder = ApiBuilder::new().with_progress(false);
    if let Some(cache_dir) = &config.cache_dir {
        builder = builder.with_cache_dir(cache_dir.clone());
    }
    let api = builder
        .build()
        .context("Failed to initialise HuggingFace hub client")?;
    let repo = api.model(config.model_repo.clone());

    let model_path = repo.get(&config.model_file).with_context(|| {
        format!(
            "Failed to fetch {} from {}",
            config.model_file, config.model_repo
        )
    })?;
    let tokenizer_path = repo.get(&config.tokenizer_file).with_context(|| {
        format!(
            "Failed to fetch {} from {}",
            config.tokenizer_file, config.model_repo
        )
    })?;

    info!("Model files cached at {}", model_path.display());

    Ok(ModelFiles {
        model_path,
        tokenizer_path,
    })
}
