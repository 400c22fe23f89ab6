//! Report Viewer Widget
//! Scrollable central panel: one section per uploaded workbook with a banner,
//! the volume trend chart, and the feature summaries.

use crate::charts::{ChartPlotter, ACCENT};
use crate::report::{WorkbookOutcome, WorkbookReport};
use crate::stats::{CategoryChange, FeatureSummary};
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 20.0;

/// Displays processed workbooks in upload order.
#[derive(Default)]
pub struct ReportViewer {
    pub outcomes: Vec<WorkbookOutcome>,
}

impl ReportViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.outcomes.clear();
    }

    pub fn set_outcomes(&mut self, outcomes: Vec<WorkbookOutcome>) {
        self.outcomes = outcomes;
    }

    /// Successfully built reports
    pub fn reports(&self) -> impl Iterator<Item = &WorkbookReport> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        if self.outcomes.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("Please upload Excel files to see the summaries.").size(18.0),
                );
            });
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (idx, outcome) in self.outcomes.iter().enumerate() {
                    Self::draw_banner(ui, &outcome.name);

                    match &outcome.result {
                        Ok(report) => Self::draw_report(ui, idx, report),
                        Err(e) => {
                            ui.label(
                                RichText::new(format!("⚠ Could not summarize this workbook: {}", e))
                                    .size(14.0)
                                    .color(Color32::from_rgb(220, 53, 69)),
                            );
                        }
                    }

                    ui.add_space(SECTION_SPACING);
                    ui.add(egui::Separator::default().spacing(2.0));
                    ui.add_space(SECTION_SPACING);
                }
            });
    }

    fn draw_banner(ui: &mut egui::Ui, name: &str) {
        egui::Frame::none()
            .fill(ACCENT)
            .rounding(8.0)
            .inner_margin(15.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(name).size(28.0).strong().color(Color32::WHITE));
                });
            });
        ui.add_space(SECTION_SPACING);
    }

    fn draw_heading(ui: &mut egui::Ui, text: &str) {
        ui.label(RichText::new(text).size(24.0).strong().color(ACCENT));
        ui.add_space(8.0);
    }

    fn draw_report(ui: &mut egui::Ui, idx: usize, report: &WorkbookReport) {
        Self::draw_heading(ui, "Month on Month Volume Trend");
        ChartPlotter::draw_volume_chart(ui, &format!("{}_{}", idx, report.name), &report.volume);
        ui.add_space(SECTION_SPACING);

        Self::draw_heading(ui, "Summary");
        if report.features.is_empty() {
            ui.label(RichText::new("No significant month-over-month changes.").color(Color32::GRAY));
        }
        for feature in &report.features {
            Self::draw_feature(ui, idx, feature);
            ui.add_space(12.0);
        }
    }

    fn draw_feature(ui: &mut egui::Ui, idx: usize, feature: &FeatureSummary) {
        ui.label(RichText::new(format!("{}:", feature.feature_name)).size(15.0).strong());
        ui.add_space(4.0);

        for change in &feature.changes {
            Self::draw_summary_point(ui, change);
        }

        if let Some(excerpt) = feature.visible_excerpt() {
            ui.add_space(8.0);
            ChartPlotter::draw_excerpt_table(ui, &format!("{}_{}", idx, feature.feature_name), excerpt);
        }
    }

    /// Bullet with the category in bold and the trend word bold and underlined.
    fn draw_summary_point(ui: &mut egui::Ui, change: &CategoryChange) {
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            ui.label("•  For category ");
            ui.label(RichText::new(&change.category).strong());
            ui.label(", number of accounts ");
            ui.label(RichText::new(change.trend.as_str()).strong().underline());
            ui.label(format!(
                " by {}% in {} as compared to the previous month.",
                change.deviation_text(),
                change.latest_period
            ));
        });
    }
}
