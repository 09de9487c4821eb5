//! Presentation core: turns an analysis payload into renderable UI state.
/// Decision text classification.
pub mod decision;
/// Time-series chart state and view derivation.
pub mod series;
/// Summary table slots and binding rules.
pub mod summary;
