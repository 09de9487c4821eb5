//! Time-series chart state and view derivation.
//!
//! `ChartSelectionState` is the page-lifetime chart model: the full dataset
//! from the last successful analysis plus the currently selected series. The
//! egui layer never touches the dataset directly; it asks for a [`ChartView`]
//! and draws whatever comes back, so a malformed or missing series degrades
//! to a notice instead of a stale or broken chart.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Series selected when the dashboard starts.
pub const DEFAULT_SERIES: &str = "RI";

/// Known series in selector button order.
pub const SERIES_ORDER: &[&str] = &["RI", "RET", "ALLKE", "ALLIE", "ALLWK"];

/// One named (x, y) dataset. `null` y entries are upstream data gaps.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SeriesData {
    #[serde(default)]
    pub x: Vec<f64>,
    #[serde(default)]
    pub y: Vec<Option<f64>>,
}

impl SeriesData {
    /// The renderer only accepts equal-length x/y sequences.
    pub fn is_well_formed(&self) -> bool {
        self.x.len() == self.y.len()
    }

    /// Contiguous runs of finite points. A gap (null or non-finite y) ends
    /// the current run, splitting the drawn polyline.
    pub fn segments(&self) -> Vec<Vec<[f64; 2]>> {
        let mut segments = Vec::new();
        let mut current: Vec<[f64; 2]> = Vec::new();
        for (x, y) in self.x.iter().zip(&self.y) {
            match y {
                Some(y) if y.is_finite() && x.is_finite() => current.push([*x, *y]),
                _ => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

/// Named series datasets as decoded from the payload.
pub type SeriesMap = BTreeMap<String, SeriesData>;

/// Y-axis label inferred from the series name.
pub fn y_axis_label(name: &str) -> &'static str {
    let upper = name.to_uppercase();
    if upper.contains("RI") || upper.contains("RET") {
        "Ratio (%)"
    } else if ["ALLKE", "ALLIE", "ALLWK"]
        .iter()
        .any(|tag| upper.contains(tag))
    {
        "Energy / Work"
    } else {
        "Value"
    }
}

/// Render instructions for the chart area.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartView {
    /// No chart; show the message centered in the chart area.
    Notice(String),
    /// Draw one line series, split into contiguous segments.
    Plot {
        series: String,
        y_label: &'static str,
        segments: Vec<Vec<[f64; 2]>>,
    },
}

/// Page-lifetime chart model: last successful dataset plus active selection.
#[derive(Clone, Debug)]
pub struct ChartSelectionState {
    data: Option<SeriesMap>,
    active_series: String,
    failure: Option<String>,
}

impl Default for ChartSelectionState {
    fn default() -> Self {
        Self {
            data: None,
            active_series: DEFAULT_SERIES.to_string(),
            failure: None,
        }
    }
}

impl ChartSelectionState {
    /// Name of the currently selected series.
    pub fn active_series(&self) -> &str {
        &self.active_series
    }

    /// User selection: replaces only the active series.
    pub fn select(&mut self, name: &str) {
        self.active_series = name.to_string();
    }

    /// Successful analysis: replaces the dataset, keeps the selection.
    ///
    /// Malformed series are kept in the map (the per-render check degrades
    /// them to a notice) but logged once here rather than on every frame.
    pub fn replace_data(&mut self, data: Option<SeriesMap>) {
        if let Some(map) = &data {
            for (name, series) in map {
                if !series.is_well_formed() {
                    tracing::warn!(
                        series = name.as_str(),
                        x_len = series.x.len(),
                        y_len = series.y.len(),
                        "Received malformed series data"
                    );
                }
            }
        }
        self.data = data;
        self.failure = None;
    }

    /// Failed analysis: drops the dataset and records the notice shown in
    /// place of the chart.
    pub fn mark_failed(&mut self, notice: impl Into<String>) {
        self.data = None;
        self.failure = Some(notice.into());
    }

    /// Derive the render instructions for the active series.
    pub fn view(&self) -> ChartView {
        if let Some(failure) = &self.failure {
            return ChartView::Notice(failure.clone());
        }
        let Some(data) = &self.data else {
            return ChartView::Notice("No data available for the chart.".to_string());
        };
        let Some(series) = data.get(&self.active_series) else {
            return ChartView::Notice(format!(
                "Series \"{}\" is not available.",
                self.active_series
            ));
        };
        if !series.is_well_formed() {
            return ChartView::Notice(format!(
                "Series \"{}\" has malformed data.",
                self.active_series
            ));
        }
        ChartView::Plot {
            series: self.active_series.clone(),
            y_label: y_axis_label(&self.active_series),
            segments: series.segments(),
        }
    }
}
