// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Startup loading of the configured encoder.
//!
//! The encoder is loaded exactly once per process and handed to the HTTP
//! layer as an injected dependency.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

use super::model_files::resolve_model_files;
use super::{HashEmbeddingModel, OnnxEmbeddingModel, OnnxModelOptions, SentenceEncoder};
use crate::config::{EmbeddingBackend, EmbeddingConfig, DEFAULT_MODEL_NAME};

/// Builds the encoder selected by `config.backend`.
///
/// # Errors
/// - Model files cannot be resolved or downloaded
/// - ONNX Runtime fails to load the model
/// - The loaded model's dimension differs from `config.dimension`
pub async fn load_encoder(config: &EmbeddingConfig) -> Result<Arc<dyn SentenceEncoder>> {
    info!(
        "Loading embedding model: {} (backend: {})",
        config.model_name, config.backend
    );

    let encoder: Arc<dyn SentenceEncoder> = match config.backend {
        EmbeddingBackend::Hash => Arc::new(HashEmbeddingModel::new(
            hash_model_name(config),
            config.dimension,
            config.normalize,
        )),
        EmbeddingBackend::Onnx => {
            let lookup_config = config.clone();
            let files = tokio::task::spawn_blocking(move || resolve_model_files(&lookup_config))
                .await
                .context("Model file resolution task panicked")??;

            let options = OnnxModelOptions {
                max_length: config.max_seq_length,
                normalize: config.normalize,
                use_gpu: config.use_gpu,
                intra_threads: config.intra_threads,
            };

            let model = OnnxEmbeddingModel::new(
                config.model_name.clone(),
                files.model_path,
                files.tokenizer_path,
                options,
            )
            .await
            .map_err(|e| {
                error!("Failed to load model {}: {}", config.model_name, e);
                e
            })?;

            Arc::new(model)
        }
    };

    if encoder.dimension() != config.dimension {
        anyhow::bail!(
            "Model {} dimension mismatch: expected {}, got {}",
            config.model_name,
            config.dimension,
            encoder.dimension()
        );
    }

    info!(
        "Successfully loaded model: {} ({} dimensions)",
        encoder.model_name(),
        encoder.dimension()
    );

    Ok(encoder)
}

/// The hash backend must not report the default sentence-transformer as its
/// model; an explicitly configured name is kept.
fn hash_model_name(config: &EmbeddingConfig) -> String {
    if config.model_name == DEFAULT_MODEL_NAME {
        format!("hash-{}", config.dimension)
    } else {
        config.model_name.clone()
    }
}
