//! Library exports for reuse in tests.
/// Analysis endpoint client and payload decoding.
pub mod analysis_api;
/// Application directory resolution.
pub mod app_dirs;
/// Persisted configuration.
pub mod config;
/// Shared egui UI modules.
pub mod egui_app;
/// Shared HTTP agent and response handling.
pub mod http_client;
/// File and console logging setup.
pub mod logging;
/// Presentation core: decision, summary, and chart models.
pub mod report;
