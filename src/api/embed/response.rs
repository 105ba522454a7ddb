// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response bodies for POST /embed and POST /embed-query

use serde::{Deserialize, Serialize};

use crate::chunk::EmbeddedChunk;

/// Response body for POST /embed
///
/// # Example
/// ```json
/// {
///   "chunks": [
///     { "content": "hello world", "metadata": {}, "embedding": [0.1, 0.2, ...] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    /// One entry per request chunk, same order
    pub chunks: Vec<EmbeddedChunk>,
}

impl From<Vec<EmbeddedChunk>> for EmbedResponse {
    fn from(chunks: Vec<EmbeddedChunk>) -> Self {
        Self { chunks }
    }
}

/// Response body for POST /embed-query
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedQueryResponse {
    pub embedded_query: Vec<f32>,
}
