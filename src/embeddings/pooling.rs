// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Sentence pooling over token-level model output.

use ndarray::{ArrayViewD, Axis};

use super::EmbeddingError;

/// Attention-mask weighted mean over the sequence axis.
///
/// `token_embeddings` is the raw model output `[batch, seq_len, hidden]`,
/// `attention_mask` is the flattened `[batch, seq_len]` mask used for the run.
/// Padding positions (mask 0) do not contribute to the mean.
pub fn mean_pool(
    token_embeddings: &ArrayViewD<'_, f32>,
    attention_mask: &[i64],
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let shape = token_embeddings.shape();
    if shape.len() != 3 {
        return Err(EmbeddingError::OutputShape(format!(
            "expected [batch, seq_len, hidden], got {:?}",
            shape
        )));
    }
    let (batch, seq_len, hidden) = (shape[0], shape[1], shape[2]);
    if attention_mask.len() != batch * seq_len {
        return Err(EmbeddingError::OutputShape(format!(
            "attention mask has {} entries for output {:?}",
            attention_mask.len(),
            shape
        )));
    }

    let mut pooled_batch = Vec::with_capacity(batch);
    for (batch_idx, item) in token_embeddings.axis_iter(Axis(0)).enumerate() {
        let item_mask = &attention_mask[batch_idx * seq_len..(batch_idx + 1) * seq_len];

        let mut pooled = vec![0.0f32; hidden];
        let mut sum_mask = 0.0f32;
        for (token, &mask) in item.axis_iter(Axis(0)).zip(item_mask) {
            if mask == 0 {
                continue;
            }
            let weight = mask as f32;
            sum_mask += weight;
            for (acc, value) in pooled.iter_mut().zip(token.iter()) {
                *acc += value * weight;
            }
        }

        let denom = sum_mask.max(1e-9);
        for value in &mut pooled {
            *value /= denom;
        }
        pooled_batch.push(pooled);
    }

    Ok(pooled_batch)
}

/// Scales `vector` to unit L2 norm in place. Zero vectors are left untouched.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
