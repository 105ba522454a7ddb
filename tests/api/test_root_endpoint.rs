// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Liveness routes: greeting, health and metrics

use super::common::{get, hash_app, post_json, send, send_raw, DIMENSION};
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_root_returns_hello_world() {
    let (status, body) = send(hash_app(), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Hello World!" }));
}

#[tokio::test]
async fn test_root_ignores_query_string() {
    let (status, body) = send(hash_app(), get("/?probe=1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hello World!");
}

#[tokio::test]
async fn test_health_reports_loaded_model() {
    let (status, body) = send(hash_app(), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model"], "all-MiniLM-L6-v2");
    assert_eq!(body["dimension"], DIMENSION);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _) = send_raw(hash_app(), get("/v1/embed")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let (status, _) = send_raw(hash_app(), get("/embed")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_metrics_count_requests_by_route() {
    let app = hash_app();

    app.clone().oneshot(get("/")).await.unwrap();
    app.clone()
        .oneshot(post_json(
            "/embed",
            json!({ "chunks": [{ "content": "a", "metadata": {} }] }).to_string(),
        ))
        .await
        .unwrap();

    let (status, body) = send_raw(app, get("/metrics")).await;
    let text = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("embedder_http_requests_total"));
    assert!(text.contains(r#"path="/embed""#), "metrics: {}", text);
    assert!(text.contains("embedder_chunks_embedded_total 1"), "metrics: {}", text);
}
