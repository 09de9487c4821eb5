//! Maintains dashboard state and bridges the presentation core to the egui UI.

mod jobs;

use std::path::PathBuf;

use egui::Color32;
use rfd::FileDialog;

use crate::analysis_api::{AnalysisResult, AnalyzeError};
use crate::config;
use crate::egui_app::state::{CsvSlot, UiState};
use jobs::{AnalyzeJob, ControllerJobs, JobMessage};

/// Notice shown in the chart area after a failed analysis.
const CHART_FAILURE_NOTICE: &str = "Failed to process the data.";

/// Maintains app state and routes analysis outcomes into the UI model.
pub struct DashboardController {
    pub ui: UiState,
    endpoint: String,
    jobs: ControllerJobs,
}

impl DashboardController {
    pub fn new() -> Self {
        Self {
            ui: UiState::default(),
            endpoint: crate::analysis_api::DEFAULT_ENDPOINT.to_string(),
            jobs: ControllerJobs::new(),
        }
    }

    /// Load persisted config and apply it to the controller.
    pub fn load_configuration(&mut self) -> Result<(), config::ConfigError> {
        let cfg = config::load_or_default()?;
        self.endpoint = cfg.analyze_endpoint;
        Ok(())
    }

    /// Pick a CSV file for one of the three inputs via file dialog.
    pub fn choose_file(&mut self, slot: CsvSlot) {
        let Some(path) = FileDialog::new().add_filter("CSV", &["csv"]).pick_file() else {
            return;
        };
        self.ui.upload.set_path(slot, Some(path));
        self.ui.upload.notice = None;
    }

    /// Validate the three inputs and start the analysis request.
    ///
    /// Validation failures surface a notice and leave all displayed state
    /// untouched; no network activity happens. While a request is in flight
    /// this is a no-op (the disabled submit button is the visible guard).
    pub fn submit(&mut self) {
        if self.ui.upload.submitting {
            return;
        }
        let files = match self.validate_files() {
            Ok(files) => files,
            Err(message) => {
                self.set_status(message.clone(), StatusTone::Warning);
                self.ui.upload.notice = Some(message);
                return;
            }
        };
        self.ui.upload.notice = None;
        self.ui.upload.submitting = true;
        self.set_status("Analyzing energy CSV files...", StatusTone::Busy);
        self.jobs.begin_analyze(AnalyzeJob {
            endpoint: self.endpoint.clone(),
            files,
        });
    }

    /// Local synchronous precondition check: every slot chosen, every file
    /// non-empty on disk.
    fn validate_files(&self) -> Result<Vec<(&'static str, PathBuf)>, String> {
        let mut files = Vec::with_capacity(CsvSlot::ALL.len());
        for slot in CsvSlot::ALL {
            let Some(path) = self.ui.upload.path(slot) else {
                return Err(format!("Please select the {} CSV file.", slot.label()));
            };
            let size = std::fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
            if size == 0 {
                return Err(format!("The {} CSV file is empty.", slot.label()));
            }
            files.push((slot.field(), path.clone()));
        }
        Ok(files)
    }

    /// User clicked a series button; acts on the current dataset only.
    pub fn select_series(&mut self, name: &str) {
        self.ui.results.chart.select(name);
    }

    /// Drain worker outcomes; called once per frame by the renderer.
    pub fn poll_background_jobs(&mut self) {
        loop {
            let message = match self.jobs.try_recv_message() {
                Ok(message) => message,
                Err(
                    std::sync::mpsc::TryRecvError::Empty
                    | std::sync::mpsc::TryRecvError::Disconnected,
                ) => break,
            };
            match message {
                JobMessage::AnalyzeFinished(message) => {
                    self.jobs.clear_analyze();
                    self.ui.upload.submitting = false;
                    match message.result {
                        Ok(result) => self.apply_result(result),
                        Err(err) => self.apply_failure(&err),
                    }
                }
            }
        }
    }

    /// Fan a successful payload out to the decision banner, summary table,
    /// and chart, then reveal the results region.
    fn apply_result(&mut self, result: AnalysisResult) {
        self.ui
            .results
            .decision
            .show_result(result.final_decision_text.as_deref());
        self.ui.results.summary.bind(result.summary_table.as_ref());
        self.ui.results.chart.replace_data(result.graph_data);
        self.ui.results.visible = true;
        self.set_status("Analysis completed", StatusTone::Info);
    }

    /// Fan a failure out to the same three sinks: error banner with forced
    /// rescale styling, full table clear, chart failure notice. The results
    /// region is revealed so the error is seen.
    fn apply_failure(&mut self, err: &AnalyzeError) {
        tracing::error!("Analysis request failed: {err}");
        self.ui.results.decision.show_error(&err.to_string());
        self.ui.results.summary.bind(None);
        self.ui.results.chart.mark_failed(CHART_FAILURE_NOTICE);
        self.ui.results.visible = true;
        self.set_status(format!("Analysis failed: {err}"), StatusTone::Error);
    }

    fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        let (label, color) = status_badge(tone);
        self.ui.status.text = text.into();
        self.ui.status.badge_label = label;
        self.ui.status.badge_color = color;
    }
}

impl Default for DashboardController {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug)]
pub enum StatusTone {
    Idle,
    Busy,
    Info,
    Warning,
    Error,
}

fn status_badge(tone: StatusTone) -> (String, Color32) {
    match tone {
        StatusTone::Idle => ("Idle".into(), Color32::from_rgb(42, 42, 42)),
        StatusTone::Busy => ("Analyzing".into(), Color32::from_rgb(31, 139, 255)),
        StatusTone::Info => ("Info".into(), Color32::from_rgb(64, 140, 112)),
        StatusTone::Warning => ("Warning".into(), Color32::from_rgb(192, 138, 43)),
        StatusTone::Error => ("Error".into(), Color32::from_rgb(192, 57, 43)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::decision::DecisionCategory;
    use crate::report::series::{ChartView, SeriesData};
    use crate::report::summary::SummaryValue;
    use std::collections::BTreeMap;

    fn controller_with_files(count: usize) -> (DashboardController, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut controller = DashboardController::new();
        for slot in CsvSlot::ALL.into_iter().take(count) {
            let path = dir.path().join(format!("{}.csv", slot.field()));
            std::fs::write(&path, "0.0,1.0\n").unwrap();
            controller.ui.upload.set_path(slot, Some(path));
        }
        (controller, dir)
    }

    #[test]
    fn submit_with_two_of_three_files_is_rejected_locally() {
        let (mut controller, _dir) = controller_with_files(2);
        controller.ui.results.decision.show_result(Some("BUENO."));

        controller.submit();

        // No network call was started and displayed state is untouched.
        assert!(!controller.ui.upload.submitting);
        assert!(!controller.jobs.analyze_in_progress());
        assert!(!controller.ui.results.visible);
        assert_eq!(controller.ui.results.decision.text, "BUENO.");
        let notice = controller.ui.upload.notice.as_deref().unwrap();
        assert!(notice.contains("ALLWK"));
    }

    #[test]
    fn submit_with_an_empty_file_is_rejected_locally() {
        let (mut controller, dir) = controller_with_files(3);
        let empty = dir.path().join("empty.csv");
        std::fs::write(&empty, "").unwrap();
        controller.ui.upload.set_path(CsvSlot::Allie, Some(empty));

        controller.submit();

        assert!(!controller.ui.upload.submitting);
        let notice = controller.ui.upload.notice.as_deref().unwrap();
        assert!(notice.contains("ALLIE"));
        assert!(notice.contains("empty"));
    }

    #[test]
    fn submit_is_a_noop_while_in_flight() {
        let (mut controller, _dir) = controller_with_files(0);
        controller.ui.upload.submitting = true;
        controller.submit();
        assert!(controller.ui.upload.notice.is_none());
        assert!(!controller.jobs.analyze_in_progress());
    }

    #[test]
    fn success_fans_out_to_all_three_sinks() {
        let (mut controller, _dir) = controller_with_files(0);
        let mut graph = BTreeMap::new();
        graph.insert(
            "RI".to_string(),
            SeriesData {
                x: vec![0.0, 1.0],
                y: vec![Some(5.0), Some(4.0)],
            },
        );
        let mut summary = BTreeMap::new();
        summary.insert(
            "time_RI_estable_menor_5pct".to_string(),
            Some(SummaryValue::Text("1.2s".into())),
        );
        controller.apply_result(AnalysisResult {
            final_decision_text: Some("PERFECTO. Régimen cuasi-estático.".into()),
            summary_table: Some(summary),
            graph_data: Some(graph),
        });

        assert!(controller.ui.results.visible);
        assert_eq!(
            controller.ui.results.decision.category,
            DecisionCategory::Perfect
        );
        assert!(!controller.ui.results.summary.is_cleared());
        assert!(matches!(
            controller.ui.results.chart.view(),
            ChartView::Plot { .. }
        ));
    }

    #[test]
    fn server_failure_fans_out_error_state() {
        let (mut controller, _dir) = controller_with_files(0);
        controller.apply_result(AnalysisResult {
            final_decision_text: Some("BUENO.".into()),
            summary_table: Some(BTreeMap::from([(
                "time_RI_estable_menor_5pct".to_string(),
                Some(SummaryValue::Text("1.2s".into())),
            )])),
            graph_data: None,
        });

        controller.apply_failure(&AnalyzeError::Server("boom".into()));

        assert!(controller.ui.results.visible);
        assert!(controller.ui.results.decision.text.contains("boom"));
        assert_eq!(
            controller.ui.results.decision.category,
            DecisionCategory::Rescale
        );
        assert!(controller.ui.results.summary.is_cleared());
        assert_eq!(
            controller.ui.results.chart.view(),
            ChartView::Notice(CHART_FAILURE_NOTICE.to_string())
        );
    }

    #[test]
    fn series_selection_bypasses_the_submission_path() {
        let (mut controller, _dir) = controller_with_files(0);
        controller.select_series("RET");
        assert_eq!(controller.ui.results.chart.active_series(), "RET");
        assert!(!controller.ui.upload.submitting);
    }
}
