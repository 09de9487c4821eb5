//! Shared state types for the egui UI.

use std::path::PathBuf;

use egui::Color32;

use crate::report::decision::{self, DecisionCategory};
use crate::report::series::ChartSelectionState;
use crate::report::summary::SummaryTable;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: StatusBarState,
    pub upload: UploadFormState,
    pub results: ResultsPanelState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            upload: UploadFormState::default(),
            results: ResultsPanelState::default(),
        }
    }
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub badge_label: String,
    pub badge_color: Color32,
}

impl StatusBarState {
    pub fn idle() -> Self {
        Self {
            text: "Select the three energy CSV files to get started".into(),
            badge_label: "Idle".into(),
            badge_color: Color32::from_rgb(42, 42, 42),
        }
    }
}

/// The three required CSV inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsvSlot {
    Allke,
    Allie,
    Allwk,
}

impl CsvSlot {
    /// All slots in upload/display order.
    pub const ALL: [CsvSlot; 3] = [CsvSlot::Allke, CsvSlot::Allie, CsvSlot::Allwk];

    /// Multipart field name the endpoint expects for this slot.
    pub fn field(self) -> &'static str {
        match self {
            Self::Allke => "allke_csv",
            Self::Allie => "allie_csv",
            Self::Allwk => "allwk_csv",
        }
    }

    /// Human-readable input label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Allke => "ALLKE (kinetic energy)",
            Self::Allie => "ALLIE (internal energy)",
            Self::Allwk => "ALLWK (external work)",
        }
    }
}

/// File selection and busy state for the upload form.
#[derive(Clone, Debug, Default)]
pub struct UploadFormState {
    pub allke: Option<PathBuf>,
    pub allie: Option<PathBuf>,
    pub allwk: Option<PathBuf>,
    /// True while an analysis request is in flight; the submit button is the
    /// only concurrency guard.
    pub submitting: bool,
    /// Validation notice shown under the form.
    pub notice: Option<String>,
}

impl UploadFormState {
    pub fn path(&self, slot: CsvSlot) -> Option<&PathBuf> {
        match slot {
            CsvSlot::Allke => self.allke.as_ref(),
            CsvSlot::Allie => self.allie.as_ref(),
            CsvSlot::Allwk => self.allwk.as_ref(),
        }
    }

    pub fn set_path(&mut self, slot: CsvSlot, path: Option<PathBuf>) {
        match slot {
            CsvSlot::Allke => self.allke = path,
            CsvSlot::Allie => self.allie = path,
            CsvSlot::Allwk => self.allwk = path,
        }
    }
}

/// Decision banner: free text plus the derived severity category.
#[derive(Clone, Debug)]
pub struct DecisionBanner {
    pub text: String,
    pub category: DecisionCategory,
}

impl Default for DecisionBanner {
    fn default() -> Self {
        Self {
            text: "No decision available yet.".into(),
            category: DecisionCategory::Pending,
        }
    }
}

impl DecisionBanner {
    /// Show the decision from a successful analysis. The category is derived
    /// from the raw optional text, so an absent decision grades `Pending`
    /// even though a fallback sentence is displayed.
    pub fn show_result(&mut self, text: Option<&str>) {
        self.text = text.unwrap_or("No decision available.").to_string();
        self.category = decision::classify(text);
    }

    /// Show a failure. The category is forced to `Rescale` regardless of the
    /// message content; this is an override, not a classification.
    pub fn show_error(&mut self, message: &str) {
        self.text = format!("Error: {message}");
        self.category = DecisionCategory::Rescale;
    }
}

/// Results region: hidden until the first submission completes.
#[derive(Clone, Debug, Default)]
pub struct ResultsPanelState {
    pub visible: bool,
    pub decision: DecisionBanner,
    pub summary: SummaryTable,
    pub chart: ChartSelectionState,
}
