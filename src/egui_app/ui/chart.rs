use eframe::egui::{self, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints};
use std::ops::RangeInclusive;

use super::style;
use crate::config::GraphType;
use crate::egui_app::controller::EguiController;
use crate::egui_app::view_model;
use crate::records::{ChartSeries, FeatureSelector};

const PLOT_HEIGHT: f32 = 320.0;
const BAR_GROUP_WIDTH: f64 = 0.8;

pub(super) fn render_visualization(controller: &mut EguiController, ui: &mut Ui) {
    ui.group(|ui| {
        render_controls(controller, ui);
        ui.add_space(8.0);
        let series = controller.chart_series();
        if series.is_empty() {
            ui.label(
                RichText::new("No data to chart yet").color(style::palette().text_muted),
            );
        } else {
            render_plot(ui, &series, controller.ui.chart.graph_type);
        }
        ui.add_space(8.0);
        render_prediction(controller, ui);
    });
}

fn render_controls(controller: &mut EguiController, ui: &mut Ui) {
    ui.horizontal(|ui| {
        for graph_type in [GraphType::Line, GraphType::Bar] {
            let selected = controller.ui.chart.graph_type == graph_type;
            if ui.selectable_label(selected, graph_type.label()).clicked() {
                controller.set_graph_type(graph_type);
            }
        }
        ui.separator();
        let current = controller.ui.chart.selector.clone();
        let features = controller.sorted_view().features().to_vec();
        egui::ComboBox::from_id_salt("feature_selector")
            .selected_text(current.label())
            .show_ui(ui, |ui| {
                let mut choice = current.clone();
                ui.selectable_value(&mut choice, FeatureSelector::All, FeatureSelector::All.label());
                for feature in features {
                    let option = FeatureSelector::Feature(feature.clone());
                    ui.selectable_value(&mut choice, option, feature);
                }
                if choice != current {
                    controller.set_feature_selector(choice);
                }
            });
    });
}

fn render_plot(ui: &mut Ui, series: &ChartSeries, graph_type: GraphType) {
    let labels = series.labels.clone();
    Plot::new("records_plot")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            view_model::axis_label(&labels, mark.value)
                .map(str::to_string)
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| match graph_type {
            GraphType::Line => {
                for dataset in &series.datasets {
                    let mut line = Line::new(
                        dataset.label.clone(),
                        PlotPoints::from(view_model::plot_points(dataset)),
                    )
                    .color(style::series_color(dataset.border))
                    .width(dataset.border_width);
                    if dataset.filled {
                        line = line.fill(0.0);
                    }
                    plot_ui.line(line);
                }
            }
            GraphType::Bar => {
                let count = series.datasets.len().max(1) as f64;
                let width = BAR_GROUP_WIDTH / count;
                for (slot, dataset) in series.datasets.iter().enumerate() {
                    let offset = (slot as f64 - (count - 1.0) / 2.0) * width;
                    let bars = view_model::plot_points(dataset)
                        .into_iter()
                        .map(|[x, y]| {
                            Bar::new(x + offset, y)
                                .width(width)
                                .fill(style::series_color(dataset.fill))
                                .stroke(Stroke::new(
                                    dataset.border_width,
                                    style::series_color(dataset.border),
                                ))
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(dataset.label.clone(), bars));
                }
            }
        });
}

fn render_prediction(controller: &EguiController, ui: &mut Ui) {
    let Some(prediction) = controller.prediction() else {
        return;
    };
    let summary = view_model::prediction_summary(prediction);
    ui.label(RichText::new("Prediction").strong().color(style::palette().accent));
    ui.label(summary.probability);
    ui.label(RichText::new(summary.verdict).color(style::verdict_color(summary.is_unicorn)));
}
