// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::api::server::AppState;
use crate::api::ErrorResponse;
use crate::version::VERSION_NUMBER;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GreetingResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub dimension: usize,
    pub version: String,
}

/// GET / - fixed liveness greeting
pub async fn root_handler() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: "Hello World!".to_string(),
    })
}

/// GET /health - liveness plus the loaded model
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model: state.provider.model_name().to_string(),
        dimension: state.provider.dimension(),
        version: VERSION_NUMBER.to_string(),
    })
}

/// GET /metrics - Prometheus text exposition
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("failed to render metrics: {}", e),
                }),
            )
                .into_response()
        }
    }
}
