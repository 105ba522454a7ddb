// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Typed failures raised while computing embeddings.

use thiserror::Error;

/// Failure of a single embedding call.
///
/// Any of these fails the whole batch; there is no partial success.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("tokenization failed: {0}")]
    Tokenization(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("unexpected model output shape: {0}")]
    OutputShape(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("backend returned {actual} vectors for {expected} inputs")]
    CountMismatch { expected: usize, actual: usize },

    #[error("embedding backend error: {0}")]
    Backend(String),
}

impl From<ort::Error> for EmbeddingError {
    fn from(err: ort::Error) -> Self {
        EmbeddingError::Inference(err.to_string())
    }
}

impl From<ndarray::ShapeError> for EmbeddingError {
    fn from(err: ndarray::ShapeError) -> Self {
        EmbeddingError::OutputShape(err.to_string())
    }
}

impl From<tokio::task::JoinError> for EmbeddingError {
    fn from(err: tokio::task::JoinError) -> Self {
        EmbeddingError::Backend(format!("inference task aborted: {}", err))
    }
}
