// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use embedder_service::{
    api::{serve, AppState},
    cli::Cli,
    config::ServiceConfig,
    embeddings::{load_encoder, EmbeddingProvider},
    logging::init_logging,
    monitoring::ServiceMetrics,
    version,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let mut config =
        ServiceConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    init_logging(&config.logging);

    println!("🚀 Starting {}...\n", version::get_version_string());

    println!("🧠 Loading embedding model: {}", config.embedding.model_name);
    let encoder = load_encoder(&config.embedding)
        .await
        .context("Failed to load embedding model")?;
    let provider = EmbeddingProvider::new(encoder).with_batch_size(config.embedding.batch_size);
    println!(
        "✅ Model loaded: {} ({} dimensions, backend: {})",
        provider.model_name(),
        provider.dimension(),
        config.embedding.backend
    );
    let metrics = ServiceMetrics::new().context("Failed to register metrics")?;
    let state = AppState::new(provider, metrics);

    let base = format!("http://{}:{}", config.server.host, config.server.port);
    println!("\n🌐 Embedding API: {}", base);
    println!("   GET  {}/", base);
    println!("   POST {}/embed", base);
    println!("   POST {}/embed-query", base);
    println!("   GET  {}/health", base);
    println!("   GET  {}/metrics", base);
    println!("\nPress Ctrl+C to stop\n");

    serve(&config.server, state).await
}
