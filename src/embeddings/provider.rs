// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding provider: chunk-level operations over a shared encoder.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::EmbeddingError;
use crate::chunk::{Chunk, EmbeddedChunk};

/// Texts per backend call when none is configured (sentence-transformers default).
pub const DEFAULT_BATCH_SIZE: usize = 32;

/// A loaded sentence-embedding model.
///
/// Implementations must be safe to call concurrently; the model is shared
/// read-only across all requests.
#[async_trait]
pub trait SentenceEncoder: Send + Sync {
    /// Encodes `texts` in one backend invocation, returning one vector per
    /// text in input order.
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Length of every vector this encoder produces.
    fn dimension(&self) -> usize;

    fn model_name(&self) -> &str;
}

/// Chunk and query embedding over an injected [`SentenceEncoder`].
///
/// Cloning is cheap; all clones share the same encoder.
#[derive(Clone)]
pub struct EmbeddingProvider {
    encoder: Arc<dyn SentenceEncoder>,
    batch_size: usize,
}

impl std::fmt::Debug for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingProvider")
            .field("model_name", &self.encoder.model_name())
            .field("dimension", &self.encoder.dimension())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl EmbeddingProvider {
    pub fn new(encoder: Arc<dyn SentenceEncoder>) -> Self {
        Self {
            encoder,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Caps how many texts go to the backend in a single call. Zero is
    /// treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn dimension(&self) -> usize {
        self.encoder.dimension()
    }

    pub fn model_name(&self) -> &str {
        self.encoder.model_name()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Embeds every chunk, preserving order, content and metadata.
    ///
    /// Fails as a unit: if any backend call fails no chunk is returned.
    pub async fn embed_batch(
        &self,
        chunks: Vec<Chunk>,
    ) -> Result<Vec<EmbeddedChunk>, EmbeddingError> {
        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.content.clone()).collect();
        let vectors = self.encode_texts(&texts).await?;

        Ok(chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, embedding)| chunk.into_embedded(embedding))
            .collect())
    }

    /// Embeds a single query string. Same vector as a one-chunk batch.
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.encode_texts(&[text.to_string()]).await?;
        vectors.pop().ok_or(EmbeddingError::CountMismatch {
            expected: 1,
            actual: 0,
        })
    }

    async fn encode_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let expected_dim = self.encoder.dimension();
        let mut vectors = Vec::with_capacity(texts.len());

        for window in texts.chunks(self.batch_size) {
            debug!(
                texts = window.len(),
                model = self.encoder.model_name(),
                "Encoding sub-batch"
            );
            let batch = self.encoder.encode(window).await?;
            if batch.len() != window.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: window.len(),
                    actual: batch.len(),
                });
            }
            if let Some(bad) = batch.iter().find(|v| v.len() != expected_dim) {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: expected_dim,
                    actual: bad.len(),
                });
            }
            vectors.extend(batch);
        }

        Ok(vectors)
    }
}
