//! Shared egui UI modules.
/// Controller bridging the presentation core to the renderer.
pub mod controller;
/// Shared state types for the egui UI.
pub mod state;
/// egui renderer.
pub mod ui;
