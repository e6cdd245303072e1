//! Library exports for reuse in benchmarks and tests.
/// Application directory helpers.
pub mod app_dirs;
/// Persisted TOML settings.
pub mod config;
/// Shared egui UI modules.
pub mod egui_app;
/// Shared HTTP agent and bounded response helpers.
pub mod http_client;
/// Logging setup.
pub mod logging;
/// Client for the remote record store service.
pub mod record_service;
/// Record model, numeric normalization and chart series derivation.
pub mod records;
