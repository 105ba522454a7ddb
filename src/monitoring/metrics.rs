// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Prometheus metrics for the embedding service.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Service-wide metric handles over a private registry.
///
/// Cloning shares the underlying collectors.
#[derive(Clone)]
pub struct ServiceMetrics {
    registry: Registry,
    http_requests: IntCounterVec,
    http_duration: HistogramVec,
    chunks_embedded: IntCounter,
    embedding_failures: IntCounter,
}

impl std::fmt::Debug for ServiceMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceMetrics").finish_non_exhaustive()
    }
}

impl ServiceMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new(
                "embedder_http_requests_total",
                "Total HTTP requests by method, route and status",
            ),
            &["method", "path", "status"],
        )?;
        let http_duration = HistogramVec::new(
            HistogramOpts::new(
                "embedder_http_request_duration_seconds",
                "HTTP request latency by method and route",
            )
            .buckets(vec![
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
            ]),
            &["method", "path"],
        )?;
        let chunks_embedded = IntCounter::new(
            "embedder_chunks_embedded_total",
            "Texts successfully embedded (chunks and queries)",
        )?;
        let embedding_failures = IntCounter::new(
            "embedder_embedding_failures_total",
            "Embedding calls that failed in the model backend",
        )?;

        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(http_duration.clone()))?;
        registry.register(Box::new(chunks_embedded.clone()))?;
        registry.register(Box::new(embedding_failures.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            http_duration,
            chunks_embedded,
            embedding_failures,
        })
    }

    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration: Duration) {
        let status = status.to_string();
        self.http_requests
            .with_label_values(&[method, path, status.as_str()])
            .inc();
        self.http_duration
            .with_label_values(&[method, path])
            .observe(duration.as_secs_f64());
    }

    pub fn record_embedded(&self, count: usize) {
        self.chunks_embedded.inc_by(count as u64);
    }

    pub fn record_embedding_failure(&self) {
        self.embedding_failures.inc();
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
