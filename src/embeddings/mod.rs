// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding Provider
//!
//! Owns the loaded sentence-embedding model and exposes chunk-level
//! (`embed_batch`) and query-level (`embed_query`) operations over it.

pub mod error;
pub mod hash_model;
pub mod loader;
pub mod model_files;
pub mod onnx_model;
pub mod pooling;
pub mod provider;

pub use error::EmbeddingError;
pub use hash_model::HashEmbeddingModel;
pub use loader::load_encoder;
pub use model_files::{resolve_model_files, ModelFiles};
pub use onnx_model::{OnnxEmbeddingModel, OnnxModelOptions};
pub use provider::{EmbeddingProvider, SentenceEncoder, DEFAULT_BATCH_SIZE};
