//! Chart Plotter Module
//! Interactive volume trend chart and excerpt tables using egui_plot.

use crate::data::{Excerpt, VolumeSeries};
use egui::{Color32, RichText};
use egui_plot::{Line, Plot, PlotPoints, Points};

/// Accent color shared by the chart, banners and headings
pub const ACCENT: Color32 = Color32::from_rgb(0, 122, 204);

const TABLE_FILL: Color32 = Color32::from_rgb(244, 244, 244);
const TABLE_TEXT: Color32 = Color32::from_rgb(51, 51, 51);

/// Draws the viewer's charts and tables.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Month label for an x-axis grid mark; only whole positions are labeled.
    pub fn month_label(labels: &[String], value: f64) -> String {
        let idx = value.round();
        if (value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    /// Line chart of account count per month.
    pub fn draw_volume_chart(ui: &mut egui::Ui, id: &str, series: &VolumeSeries) {
        let points = series.plottable();
        if points.is_empty() {
            ui.label(RichText::new("No volume data").color(Color32::GRAY));
            return;
        }

        let labels = series.labels();

        Plot::new(format!("volume_{}", id))
            .height(280.0)
            .allow_scroll(false)
            .x_axis_label("Month-Year")
            .y_axis_label("Account Count")
            .x_axis_formatter(move |mark, _range| Self::month_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                let line_points: PlotPoints =
                    points.iter().map(|&(i, c)| [i as f64, c]).collect();
                plot_ui.line(
                    Line::new(line_points)
                        .color(ACCENT)
                        .width(2.0)
                        .name("account_count"),
                );

                let markers: PlotPoints = points.iter().map(|&(i, c)| [i as f64, c]).collect();
                plot_ui.points(Points::new(markers).radius(4.0).color(ACCENT));
            });
    }

    /// Bordered grid of the excerpt: category column, then period values.
    pub fn draw_excerpt_table(ui: &mut egui::Ui, id: &str, excerpt: &Excerpt) {
        egui::Frame::none()
            .fill(TABLE_FILL)
            .stroke(egui::Stroke::new(1.0, Color32::BLACK))
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("excerpt_{}", id)))
                    .striped(true)
                    .min_col_width(55.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for header in &excerpt.columns {
                            ui.label(RichText::new(header).strong().size(12.0).color(TABLE_TEXT));
                        }
                        ui.end_row();

                        for row in &excerpt.rows {
                            ui.label(RichText::new(&row.category).size(12.0).color(TABLE_TEXT));
                            for i in 0..excerpt.period_labels().len() {
                                let text = row
                                    .value(i)
                                    .map(|v| format!("{:.2}", v))
                                    .unwrap_or_else(|| "-".to_string());
                                ui.label(RichText::new(text).size(12.0).color(TABLE_TEXT));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_whole_positions_get_month_labels() {
        let labels = vec!["Jan".to_string(), "Feb".to_string()];
        assert_eq!(ChartPlotter::month_label(&labels, 0.0), "Jan");
        assert_eq!(ChartPlotter::month_label(&labels, 1.0), "Feb");
        assert_eq!(ChartPlotter::month_label(&labels, 0.5), "");
        assert_eq!(ChartPlotter::month_label(&labels, -1.0), "");
        assert_eq!(ChartPlotter::month_label(&labels, 5.0), "");
    }
}
