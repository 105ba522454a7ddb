// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX sentence-transformer encoder
//!
//! Runs an exported sentence-transformer (all-MiniLM-L6-v2 by default) with
//! ONNX Runtime and reproduces the sentence-transformers `encode` pipeline:
//! - BERT tokenization with truncation to `max_length`
//! - Padding to the longest sequence in the batch
//! - Attention-mask weighted mean pooling over token embeddings
//! - Optional L2 normalization

use anyhow::{Context, Result};
use async_trait::async_trait;
use ndarray::Array2;
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{info, warn};

use super::pooling::{l2_normalize, mean_pool};
use super::{EmbeddingError, SentenceEncoder};

/// Runtime options for [`OnnxEmbeddingModel`].
#[derive(Debug, Clone)]
pub struct OnnxModelOptions {
    /// Token limit per text; longer texts are truncated.
    pub max_length: usize,
    /// Apply L2 normalization to pooled vectors.
    pub normalize: bool,
    /// Try the CUDA execution provider before CPU.
    pub use_gpu: bool,
    pub intra_threads: usize,
}

impl Default for OnnxModelOptions {
    fn default() -> Self {
        Self {
            max_length: 256,
            normalize: true,
            use_gpu: false,
            intra_threads: 4,
        }
    }
}

/// ONNX-based sentence embedding model
///
/// # Thread Safety
/// All fields are behind `Arc`, so clones share one session. ONNX Runtime
/// needs exclusive access for `run`, hence the mutex around the session.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    /// Read from the model output at load time
    dimension: usize,
    max_length: usize,
    normalize: bool,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("max_length", &self.max_length)
            .field("normalize", &self.normalize)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Loads the model and tokenizer from disk on the blocking pool.
    ///
    /// A validation inference runs before returning; its output width becomes
    /// the model dimension. Fails if either file is missing, the runtime
    /// cannot load the model, or the output is not `[batch, seq_len, hidden]`.
    ///
    /// # Example
    /// ```ignore
    /// let model = OnnxEmbeddingModel::new(
    ///     "all-MiniLM-L6-v2",
    ///     "./models/all-MiniLM-L6-v2/onnx/model.onnx",
    ///     "./models/all-MiniLM-L6-v2/tokenizer.json",
    ///     OnnxModelOptions::default(),
    /// ).await?;
    /// assert_eq!(model.dimension(), 384);
    /// ```
    pub async fn new<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
        options: OnnxModelOptions,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref().to_path_buf();
        let tokenizer_path = tokenizer_path.as_ref().to_path_buf();

        tokio::task::spawn_blocking(move || {
            Self::load_blocking(model_name, &model_path, &tokenizer_path, options)
        })
        .await
        .context("Model loading task panicked")?
    }

    fn load_blocking(
        model_name: String,
        model_path: &Path,
        tokenizer_path: &Path,
        options: OnnxModelOptions,
    ) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        let session = build_session(model_path, &options)?;
        info!("ONNX embedding model loaded from {}", model_path.display());

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: options.max_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure tokenizer truncation: {}", e))?;
        // Padding is done per batch in `forward`
        tokenizer.with_padding(None);

        let mut model = Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension: 0,
            max_length: options.max_length,
            normalize: options.normalize,
        };

        let probe = model
            .forward(&["validation test".to_string()])
            .context("Validation inference failed")?;
        model.dimension = probe.first().map(Vec::len).unwrap_or(0);
        if model.dimension == 0 {
            anyhow::bail!("Model produced an empty embedding during validation");
        }

        info!(
            model = %model.model_name,
            dimension = model.dimension,
            max_length = model.max_length,
            "ONNX embedding model validated"
        );

        Ok(model)
    }

    /// Tokenize, run, pool and optionally normalize. Blocking.
    fn forward(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let encodings = self
            .tokenizer
            .encode_batch(inputs, true)
            .map_err(|e| EmbeddingError::Tokenization(e.to_string()))?;

        let batch = encodings.len();
        let max_len = encodings
            .iter()
            .map(|enc| enc.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids = Vec::with_capacity(batch * max_len);
        let mut attention_mask = Vec::with_capacity(batch * max_len);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();

            input_ids.extend(ids.iter().map(|&id| id as i64));
            attention_mask.extend(mask.iter().map(|&m| m as i64));

            let padding_needed = max_len - ids.len();
            input_ids.extend(std::iter::repeat(0i64).take(padding_needed));
            attention_mask.extend(std::iter::repeat(0i64).take(padding_needed));
        }

        // Single-segment input: all token types are zero
        let token_type_ids = vec![0i64; batch * max_len];

        let input_ids_array = Array2::from_shape_vec((batch, max_len), input_ids)?;
        let attention_mask_array =
            Array2::from_shape_vec((batch, max_len), attention_mask.clone())?;
        let token_type_ids_array = Array2::from_shape_vec((batch, max_len), token_type_ids)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| EmbeddingError::Backend("ONNX session lock poisoned".to_string()))?;
        let outputs = session.run(ort::inputs![
            "input_ids" => Value::from_array(input_ids_array)?,
            "attention_mask" => Value::from_array(attention_mask_array)?,
            "token_type_ids" => Value::from_array(token_type_ids_array)?
        ])?;

        // Index 0 rather than a name: exports differ in output naming
        let token_embeddings = outputs[0].try_extract_array::<f32>()?;
        let mut pooled = mean_pool(&token_embeddings, &attention_mask)?;

        if self.normalize {
            for vector in &mut pooled {
                l2_normalize(vector);
            }
        }

        Ok(pooled)
    }

    /// Output dimension of this model
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

#[async_trait]
impl SentenceEncoder for OnnxEmbeddingModel {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let model = self.clone();
        let texts = texts.to_vec();
        let embeddings = tokio::task::spawn_blocking(move || model.forward(&texts)).await??;

        if let Some(bad) = embeddings.iter().find(|e| e.len() != self.dimension) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: bad.len(),
            });
        }

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Builds the runtime session, trying CUDA first when requested.
fn build_session(model_path: &Path, options: &OnnxModelOptions) -> Result<Session> {
    if options.use_gpu {
        info!("Attempting CUDA execution provider");
        let cuda_result = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CUDAExecutionProvider::default().build()])
            .context("Failed to set CUDA execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(options.intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path);

        match cuda_result {
            Ok(session) => {
                info!("CUDA execution provider initialized");
                return Ok(session);
            }
            Err(e) => {
                warn!("CUDA execution provider failed: {}", e);
                warn!("Falling back to CPU execution provider");
            }
        }
    }

    Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CPUExecutionProvider::default().build()])
        .context("Failed to set CPU execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(options.intra_threads)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path)
        .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))
}
