// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed happy paths

use super::common::{as_vector, hash_app, post_json, send, DIMENSION};
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_embed_single_chunk() {
    let body = json!({
        "chunks": [{ "content": "hello", "metadata": { "k": "v" } }]
    });

    let (status, response) = send(hash_app(), post_json("/embed", body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let chunks = response["chunks"].as_array().unwrap();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0]["content"], "hello");
    assert_eq!(chunks[0]["metadata"], json!({ "k": "v" }));
    assert_eq!(as_vector(&chunks[0]["embedding"]).len(), DIMENSION);
}

#[tokio::test]
async fn test_embed_preserves_order_and_metadata() {
    let body = json!({
        "chunks": [
            { "content": "first", "metadata": { "page": 1, "tags": ["a", "b"] } },
            { "content": "second", "metadata": {} },
            { "content": "third", "metadata": { "nested": { "deep": null } } }
        ]
    });

    let (status, response) = send(hash_app(), post_json("/embed", body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let chunks = response["chunks"].as_array().unwrap();
    let contents: Vec<&str> = chunks
        .iter()
        .map(|c| c["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
    assert_eq!(chunks[0]["metadata"], json!({ "page": 1, "tags": ["a", "b"] }));
    assert_eq!(chunks[1]["metadata"], json!({}));
    assert_eq!(chunks[2]["metadata"], json!({ "nested": { "deep": null } }));
    assert_ne!(chunks[0]["embedding"], chunks[1]["embedding"]);
}

#[tokio::test]
async fn test_embed_numeric_content_is_coerced_to_text() {
    let numeric = json!({ "chunks": [{ "content": 123, "metadata": {} }] });
    let text = json!({ "chunks": [{ "content": "123", "metadata": {} }] });

    let (status, numeric_response) =
        send(hash_app(), post_json("/embed", numeric.to_string())).await;
    let (_, text_response) = send(hash_app(), post_json("/embed", text.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(numeric_response["chunks"][0]["content"], "123");
    assert_eq!(
        numeric_response["chunks"][0]["embedding"],
        text_response["chunks"][0]["embedding"]
    );
}

#[tokio::test]
async fn test_embed_huge_integer_content_is_not_rounded() {
    let body = r#"{"chunks":[{"content":98765432109876543210987,"metadata":{}}]}"#;

    let (status, response) = send(hash_app(), post_json("/embed", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["chunks"][0]["content"], "98765432109876543210987");
}

#[tokio::test]
async fn test_embed_mixed_content_types() {
    let body = json!({
        "chunks": [
            { "content": true, "metadata": {} },
            { "content": null, "metadata": {} },
            { "content": 1.5, "metadata": {} },
            { "content": "", "metadata": {} }
        ]
    });

    let (status, response) = send(hash_app(), post_json("/embed", body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let chunks = response["chunks"].as_array().unwrap();
    assert_eq!(chunks.len(), 4);
    assert_eq!(chunks[0]["content"], "true");
    assert_eq!(chunks[1]["content"], "null");
    assert_eq!(chunks[2]["content"], "1.5");
    assert_eq!(chunks[3]["content"], "");
    for chunk in chunks {
        assert_eq!(as_vector(&chunk["embedding"]).len(), DIMENSION);
    }
}

#[tokio::test]
async fn test_embed_empty_batch_returns_empty_list() {
    let (status, response) = send(hash_app(), post_json("/embed", r#"{"chunks":[]}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "chunks": [] }));
}

#[tokio::test]
async fn test_embed_large_batch_crosses_sub_batches() {
    let chunks: Vec<_> = (0..70)
        .map(|i| json!({ "content": format!("chunk {}", i), "metadata": { "i": i } }))
        .collect();
    let body = json!({ "chunks": chunks });

    let (status, response) = send(hash_app(), post_json("/embed", body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    let returned = response["chunks"].as_array().unwrap();
    assert_eq!(returned.len(), 70);
    for (i, chunk) in returned.iter().enumerate() {
        assert_eq!(chunk["metadata"]["i"], i);
        assert_eq!(chunk["content"], format!("chunk {}", i));
    }
}

#[tokio::test]
async fn test_embed_is_deterministic() {
    let body = json!({ "chunks": [{ "content": "same text", "metadata": {} }] }).to_string();

    let (_, first) = send(hash_app(), post_json("/embed", body.clone())).await;
    let (_, second) = send(hash_app(), post_json("/embed", body)).await;

    assert_eq!(first["chunks"][0]["embedding"], second["chunks"][0]["embedding"]);
}

#[tokio::test]
async fn test_embed_ignores_client_supplied_embedding() {
    let body = json!({
        "chunks": [{ "content": "x", "metadata": {}, "embedding": [1.0, 2.0] }]
    });

    let (status, response) = send(hash_app(), post_json("/embed", body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        as_vector(&response["chunks"][0]["embedding"]).len(),
        DIMENSION
    );
}

#[tokio::test]
async fn test_concurrent_embed_requests() {
    let app = hash_app();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let body = json!({
                    "chunks": [{ "content": format!("text {}", i), "metadata": { "i": i } }]
                });
                send(app, post_json("/embed", body.to_string())).await
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let (status, response) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response["chunks"][0]["metadata"]["i"], i);
    }
}
