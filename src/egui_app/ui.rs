//! egui renderer for the record board.

mod chart;
mod forms;
mod grid;
pub mod style;

use std::time::Duration;

use crate::config::{self, AppConfig};
use crate::egui_app::controller::{EguiController, JobKind};
use eframe::egui::{self, Frame, Margin, RichText, Vec2};

/// Smallest window size that keeps the grid and chart usable.
pub const MIN_VIEWPORT_SIZE: Vec2 = Vec2::new(900.0, 640.0);

const LOADING_REPAINT: Duration = Duration::from_millis(50);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
    started: bool,
}

impl EguiApp {
    /// Create the app from persisted configuration.
    ///
    /// A malformed config file is reported in the status bar and defaults are
    /// used instead.
    pub fn new() -> Result<Self, String> {
        let (config, config_error) = match config::load_or_default() {
            Ok(config) => (config, None),
            Err(err) => {
                tracing::warn!("Using default config: {err}");
                (AppConfig::default(), Some(err))
            }
        };
        let mut controller = EguiController::from_config(config)
            .map_err(|err| format!("Failed to configure record service: {err}"))?;
        if let Some(err) = config_error {
            controller.set_status(
                format!("Config ignored: {err}"),
                style::StatusTone::Warning,
            );
        }
        Ok(Self::with_controller(controller))
    }

    /// Wrap an already configured controller.
    pub fn with_controller(controller: EguiController) -> Self {
        Self {
            controller,
            visuals_set: false,
            started: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::light();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::bottom("status_bar")
            .frame(
                Frame::NONE
                    .fill(palette.bg_tertiary)
                    .inner_margin(Margin::symmetric(8, 4)),
            )
            .show(ctx, |ui| {
                let status = &self.controller.ui.status;
                ui.horizontal(|ui| {
                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                    ui.painter()
                        .circle_filled(rect.center(), 6.0, status.badge_color);
                    ui.label(RichText::new(&status.badge_label).strong());
                    ui.separator();
                    ui.label(&status.text)
                        .on_hover_text(status.log_text());
                    if self.controller.is_loading() {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.add(egui::Spinner::new());
                        });
                    }
                });
            });
    }

    fn render_error_banner(&mut self, ui: &mut egui::Ui) {
        let Some(error) = self.controller.last_error() else {
            return;
        };
        let palette = style::palette();
        let message = error.message().to_string();
        let retry = self.controller.failed_job().map(retry_label);
        Frame::NONE
            .fill(palette.danger.gamma_multiply(0.12))
            .stroke(egui::Stroke::new(1.0, palette.danger))
            .corner_radius(egui::CornerRadius::same(5))
            .inner_margin(Margin::same(8))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(message).color(palette.danger));
                    if let Some(label) = retry
                        && ui.small_button(label).clicked()
                    {
                        self.controller.retry_failed();
                    }
                });
            });
        ui.add_space(8.0);
    }

    fn render_main(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("main_scroll")
                .show(ui, |ui| {
                    ui.heading("Company Records");
                    ui.add_space(8.0);
                    self.render_error_banner(ui);
                    forms::render_entry_forms(&mut self.controller, ui);
                    ui.add_space(12.0);
                    grid::render_grid(&mut self.controller, ui);
                    ui.add_space(12.0);
                    if ui.button("Predict").clicked() {
                        self.controller.request_prediction();
                    }
                    if self.controller.ui.view.visualization_visible {
                        ui.add_space(12.0);
                        chart::render_visualization(&mut self.controller, ui);
                    }
                });
        });
    }
}

fn retry_label(kind: JobKind) -> &'static str {
    match kind {
        JobKind::Fetch => "Reload records",
        JobKind::Insert => "Retry insert",
        JobKind::Upload => "Retry upload",
        JobKind::Delete => "Retry delete",
        JobKind::Prediction => "Retry prediction",
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        if !self.started {
            self.controller.start();
            self.started = true;
        }
        self.controller.poll_jobs();
        self.render_status(ctx);
        self.render_main(ctx);
        if self.controller.is_loading() {
            ctx.request_repaint_after(LOADING_REPAINT);
        }
    }
}
