// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding API Module
//!
//! POST /embed (batch of chunks) and POST /embed-query (single query string).

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{embed_handler, embed_query_handler};
pub use request::{EmbedQueryRequest, EmbedRequest};
pub use response::{EmbedQueryResponse, EmbedResponse};
