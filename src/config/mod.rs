// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod service;

pub use service::{
    EmbeddingBackend, EmbeddingConfig, LogFormat, LoggingConfig, ServerConfig, ServiceConfig,
    DEFAULT_MODEL_NAME,
};
