//! egui renderer for the dashboard.
//!
//! All state lives in the controller; this layer only draws it and forwards
//! clicks back. Chart drawing consumes the [`ChartView`] derived by the
//! presentation core, so every degraded state arrives here as a plain notice.

use eframe::egui::{self, Color32, Frame, RichText, Ui};
use egui_plot::{Line, Plot, PlotPoints};

use crate::egui_app::controller::DashboardController;
use crate::egui_app::state::CsvSlot;
use crate::report::decision::DecisionCategory;
use crate::report::series::{ChartView, SERIES_ORDER};

/// Minimum window size the layout is designed for.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(760.0, 560.0);

const CHART_HEIGHT: f32 = 320.0;

/// Renders the egui UI using the shared controller state.
pub struct DashboardApp {
    controller: DashboardController,
    visuals_set: bool,
}

impl DashboardApp {
    /// Create the app, loading persisted configuration.
    pub fn new() -> Result<Self, String> {
        let mut controller = DashboardController::new();
        controller
            .load_configuration()
            .map_err(|err| format!("Failed to load config: {err}"))?;
        Ok(Self {
            controller,
            visuals_set: false,
        })
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = Color32::from_rgb(12, 12, 12);
        visuals.panel_fill = Color32::from_rgb(16, 16, 16);
        visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(16, 16, 16);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar")
            .frame(Frame::none().fill(Color32::from_rgb(24, 24, 24)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Quasi-Static Regime Check").color(Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .button(RichText::new("Close").color(Color32::WHITE))
                            .clicked()
                        {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
            });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(Frame::none().fill(Color32::from_rgb(0, 0, 0)))
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    ui.add_space(8.0);
                    ui.painter().circle_filled(
                        ui.cursor().min + egui::vec2(9.0, 11.0),
                        9.0,
                        status.badge_color,
                    );
                    ui.add_space(8.0);
                    ui.label(RichText::new(&status.badge_label).color(Color32::WHITE));
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(Color32::WHITE));
                });
            });
    }

    fn render_upload_form(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Energy history CSV files").color(Color32::WHITE));
        ui.add_space(6.0);
        for slot in CsvSlot::ALL {
            ui.horizontal(|ui| {
                ui.label(RichText::new(slot.label()).color(Color32::LIGHT_GRAY));
                let button_label = self
                    .controller
                    .ui
                    .upload
                    .path(slot)
                    .and_then(|path| path.file_name())
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "Choose a CSV file...".to_string());
                if ui.button(button_label).clicked() {
                    self.controller.choose_file(slot);
                }
            });
        }
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let submitting = self.controller.ui.upload.submitting;
            let label = if submitting { "Processing..." } else { "Check" };
            let button = ui.add_enabled(
                !submitting,
                egui::Button::new(RichText::new(label).color(Color32::WHITE)),
            );
            if button.clicked() {
                self.controller.submit();
            }
        });
        if let Some(notice) = self.controller.ui.upload.notice.clone() {
            ui.add_space(4.0);
            ui.colored_label(Color32::from_rgb(192, 138, 43), notice);
        }
    }

    fn render_results(&mut self, ui: &mut Ui) {
        self.render_decision(ui);
        ui.add_space(10.0);
        self.render_summary(ui);
        ui.add_space(10.0);
        self.render_chart(ui);
    }

    fn render_decision(&mut self, ui: &mut Ui) {
        let banner = self.controller.ui.results.decision.clone();
        let color = decision_color(banner.category);
        Frame::none()
            .fill(color.gamma_multiply(0.25))
            .stroke(egui::Stroke::new(1.0, color))
            .inner_margin(egui::Margin::same(8))
            .show(ui, |ui| {
                ui.label(RichText::new(&banner.text).color(Color32::WHITE));
            });
    }

    fn render_summary(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Summary").color(Color32::WHITE));
        let slots = self.controller.ui.results.summary.slots().to_vec();
        egui::Grid::new("summary_table")
            .striped(true)
            .num_columns(2)
            .show(ui, |ui| {
                for slot in &slots {
                    ui.label(RichText::new(slot.label).color(Color32::LIGHT_GRAY));
                    ui.label(RichText::new(&slot.value).color(Color32::WHITE));
                    ui.end_row();
                }
            });
    }

    fn render_chart(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let active = self.controller.ui.results.chart.active_series().to_string();
            for name in SERIES_ORDER {
                if ui.selectable_label(active == *name, *name).clicked() {
                    self.controller.select_series(name);
                }
            }
        });
        ui.add_space(4.0);
        match self.controller.ui.results.chart.view() {
            ChartView::Notice(text) => {
                ui.add_space(CHART_HEIGHT / 3.0);
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(text).color(Color32::GRAY));
                });
                ui.add_space(CHART_HEIGHT / 3.0);
            }
            ChartView::Plot {
                series,
                y_label,
                segments,
            } => {
                let color = series_color(&series);
                Plot::new("qs_chart")
                    .height(CHART_HEIGHT)
                    .x_axis_label("Time (s)")
                    .y_axis_label(y_label)
                    .show(ui, |plot_ui| {
                        for segment in segments {
                            plot_ui.line(
                                Line::new(series.clone(), PlotPoints::from(segment)).color(color),
                            );
                        }
                    });
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.poll_background_jobs();
        self.render_top_bar(ctx);
        self.render_status(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_upload_form(ui);
                if self.controller.ui.results.visible {
                    ui.add_space(10.0);
                    ui.separator();
                    ui.add_space(10.0);
                    self.render_results(ui);
                }
            });
        });
        ctx.request_repaint();
    }
}

fn decision_color(category: DecisionCategory) -> Color32 {
    match category {
        DecisionCategory::Perfect => Color32::from_rgb(46, 160, 87),
        DecisionCategory::VeryGood => Color32::from_rgb(64, 140, 112),
        DecisionCategory::Good => Color32::from_rgb(130, 170, 60),
        DecisionCategory::Acceptable => Color32::from_rgb(192, 138, 43),
        DecisionCategory::Rescale => Color32::from_rgb(192, 57, 43),
        DecisionCategory::Pending => Color32::from_rgb(110, 110, 110),
    }
}

fn series_color(name: &str) -> Color32 {
    match name {
        "RI" => Color32::from_rgb(90, 176, 255),
        "RET" => Color32::from_rgb(255, 176, 90),
        "ALLKE" => Color32::from_rgb(192, 57, 43),
        "ALLIE" => Color32::from_rgb(64, 140, 112),
        "ALLWK" => Color32::from_rgb(154, 120, 220),
        _ => Color32::LIGHT_GRAY,
    }
}
