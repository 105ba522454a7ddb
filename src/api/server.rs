// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::embed::{embed_handler, embed_query_handler};
use super::handlers::{health_handler, metrics_handler, root_handler};
use super::middleware::track_metrics;
use crate::config::ServerConfig;
use crate::embeddings::EmbeddingProvider;
use crate::monitoring::ServiceMetrics;

/// Shared request state
///
/// The provider wraps the single model instance loaded at startup; every
/// handler sees the same one.
#[derive(Debug, Clone)]
pub struct AppState {
    pub provider: EmbeddingProvider,
    pub metrics: ServiceMetrics,
}

impl AppState {
    pub fn new(provider: EmbeddingProvider, metrics: ServiceMetrics) -> Self {
        Self { provider, metrics }
    }
}

/// Builds the router with every route and layer.
pub fn create_app(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/embed", post(embed_handler))
        .route("/embed-query", post(embed_query_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), track_metrics))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `config.host:config.port` and serves until Ctrl-C or SIGTERM.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    let addr = listener.local_addr()?;

    info!("Embedding API listening on {}", addr);

    axum::serve(listener, create_app(state, config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Embedding API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
