// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Error paths for the embedding routes
//!
//! Every failure must come back as JSON `{"error": ...}`.

use super::common::{failing_app, get, hash_app, post_json, send, send_raw};
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_malformed_json_is_client_error() {
    let (status, response) = send(hash_app(), post_json("/embed", "{not json")).await;

    assert!(status.is_client_error(), "status was {}", status);
    assert!(response["error"].is_string());
}

#[tokio::test]
async fn test_malformed_query_json_is_client_error() {
    let (status, response) = send(hash_app(), post_json("/embed-query", r#"{"queryText":"#)).await;

    assert!(status.is_client_error(), "status was {}", status);
    assert!(response["error"].is_string());
}

#[tokio::test]
async fn test_missing_chunks_field_is_client_error() {
    let (status, response) = send(hash_app(), post_json("/embed", "{}")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response["error"].as_str().unwrap().contains("chunks"));
}

#[tokio::test]
async fn test_missing_metadata_is_client_error() {
    let body = json!({ "chunks": [{ "content": "no metadata" }] });

    let (status, response) = send(hash_app(), post_json("/embed", body.to_string())).await;

    assert!(status.is_client_error());
    assert!(response["error"].is_string());
}

#[tokio::test]
async fn test_missing_query_text_is_client_error() {
    let (status, response) = send(hash_app(), post_json("/embed-query", r#"{"query":"x"}"#)).await;

    assert!(status.is_client_error());
    assert!(response["error"].as_str().unwrap().contains("queryText"));
}

#[tokio::test]
async fn test_non_string_query_text_is_client_error() {
    let (status, response) =
        send(hash_app(), post_json("/embed-query", r#"{"queryText":42}"#)).await;

    assert!(status.is_client_error());
    assert!(response["error"].is_string());
}

#[tokio::test]
async fn test_missing_content_type_is_client_error() {
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/embed")
        .body(axum::body::Body::from(r#"{"chunks":[]}"#))
        .unwrap();

    let (status, response) = send(hash_app(), request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(response["error"].is_string());
}

#[tokio::test]
async fn test_backend_failure_returns_500_json() {
    let body = json!({ "chunks": [{ "content": "hello", "metadata": {} }] });

    let (status, response) = send(failing_app(), post_json("/embed", body.to_string())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.as_object().unwrap().len(), 1);
    assert!(response["error"]
        .as_str()
        .unwrap()
        .contains("CUDA out of memory"));
}

#[tokio::test]
async fn test_query_backend_failure_returns_500_json() {
    let (status, response) =
        send(failing_app(), post_json("/embed-query", r#"{"queryText":"x"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response["error"].is_string());
}

#[tokio::test]
async fn test_empty_batch_never_reaches_failing_backend() {
    let (status, response) = send(failing_app(), post_json("/embed", r#"{"chunks":[]}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "chunks": [] }));
}

#[tokio::test]
async fn test_failure_does_not_poison_later_requests() {
    let app = hash_app();

    let (bad, _) = send_raw(app.clone(), post_json("/embed", "[1, 2")).await;
    assert!(bad.is_client_error());

    let body = json!({ "chunks": [{ "content": "still fine", "metadata": {} }] });
    let (good, _) = send(app, post_json("/embed", body.to_string())).await;
    assert_eq!(good, StatusCode::OK);
}

#[tokio::test]
async fn test_failures_are_counted_in_metrics() {
    let app = failing_app();

    app.clone()
        .oneshot(post_json("/embed-query", r#"{"queryText":"x"}"#))
        .await
        .unwrap();

    let (_, body) = send_raw(app, get("/metrics")).await;
    let text = String::from_utf8(body).unwrap();
    assert!(
        text.contains("embedder_embedding_failures_total 1"),
        "metrics: {}",
        text
    );
    assert!(text.contains(r#"status="500""#), "metrics: {}", text);
}
