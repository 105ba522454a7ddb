// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request bodies for POST /embed and POST /embed-query

use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;

/// Request body for POST /embed
///
/// # Example
/// ```json
/// {
///   "chunks": [
///     { "content": "hello world", "metadata": { "page": 1 } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedRequest {
    /// Chunks to embed, in the order the response should follow
    pub chunks: Vec<Chunk>,
}

/// Request body for POST /embed-query
///
/// # Example
/// ```json
/// { "queryText": "what is a transformer?" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedQueryRequest {
    pub query_text: String,
}
