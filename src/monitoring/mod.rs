// src/monitoring/mod.rs - Main monitoring module

pub mod metrics;

pub use metrics::ServiceMetrics;
