// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Chunk types exchanged with clients.
//!
//! A [`Chunk`] arrives loosely typed: `content` may be any JSON value and is
//! turned into text by [`coerce_content`] at deserialization time, so one odd
//! item never fails a whole batch.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Arbitrary client metadata carried through untouched.
pub type Metadata = Map<String, Value>;

/// A unit of text plus metadata to be embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    #[serde(deserialize_with = "deserialize_content")]
    pub content: String,

    pub metadata: Metadata,

    /// Ignored on input; only populated on the way out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Chunk {
    pub fn new(content: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            content: content.into(),
            metadata,
            embedding: None,
        }
    }

    /// Pairs this chunk with its vector.
    pub fn into_embedded(self, embedding: Vec<f32>) -> EmbeddedChunk {
        EmbeddedChunk {
            content: self.content,
            metadata: self.metadata,
            embedding,
        }
    }
}

/// Output form of a chunk, one per input chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedChunk {
    pub content: String,
    pub metadata: Metadata,
    pub embedding: Vec<f32>,
}

/// Converts any JSON value into the text that gets embedded.
///
/// Strings pass through unchanged. Every other value becomes its compact
/// JSON text, e.g. `123` → `"123"`, `true` → `"true"`, `null` → `"null"`.
/// Numbers keep the digits the client sent (serde_json `arbitrary_precision`),
/// so integers beyond `u64` are not rounded through `f64`.
pub fn coerce_content(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn deserialize_content<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(coerce_content)
}
