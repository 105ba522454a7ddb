// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed and POST /embed-query handlers
//!
//! Bodies are parsed by axum's `Json` extractor; parse failures become a 4xx
//! `{"error": ...}` before any model work. Provider failures are logged and
//! returned as 500 `{"error": ...}`.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::time::Instant;
use tracing::{error, info};

use crate::api::embed::{EmbedQueryRequest, EmbedQueryResponse, EmbedRequest, EmbedResponse};
use crate::api::server::AppState;
use crate::api::ApiError;
use crate::embeddings::EmbeddingError;

/// POST /embed handler
///
/// # Request Body
/// ```json
/// { "chunks": [ { "content": "text", "metadata": {} } ] }
/// ```
///
/// # Response Body
/// ```json
/// { "chunks": [ { "content": "text", "metadata": {}, "embedding": [0.1, ...] } ] }
/// ```
pub async fn embed_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmbedRequest>, JsonRejection>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let Json(request) = payload?;
    let chunk_count = request.chunks.len();
    let start = Instant::now();

    let chunks = state
        .provider
        .embed_batch(request.chunks)
        .await
        .map_err(|e| embedding_failed(&state, "batch", e))?;

    state.metrics.record_embedded(chunks.len());
    info!(
        chunks = chunk_count,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Embedded batch"
    );

    Ok(Json(EmbedResponse::from(chunks)))
}

/// POST /embed-query handler
///
/// # Request Body
/// ```json
/// { "queryText": "what is a transformer?" }
/// ```
///
/// # Response Body
/// ```json
/// { "embeddedQuery": [0.1, ...] }
/// ```
pub async fn embed_query_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmbedQueryRequest>, JsonRejection>,
) -> Result<Json<EmbedQueryResponse>, ApiError> {
    let Json(request) = payload?;
    let start = Instant::now();

    let embedded_query = state
        .provider
        .embed_query(&request.query_text)
        .await
        .map_err(|e| embedding_failed(&state, "query", e))?;

    state.metrics.record_embedded(1);
    info!(
        query_chars = request.query_text.chars().count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Embedded query"
    );

    Ok(Json(EmbedQueryResponse { embedded_query }))
}

fn embedding_failed(state: &AppState, kind: &str, err: EmbeddingError) -> ApiError {
    error!(kind, error = %err, "Embedding failed");
    state.metrics.record_embedding_failure();
    ApiError::Embedding(err)
}
