// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod embed;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use embed::{
    embed_handler, embed_query_handler, EmbedQueryRequest, EmbedQueryResponse, EmbedRequest,
    EmbedResponse,
};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{GreetingResponse, HealthResponse};
pub use server::{create_app, serve, AppState};
