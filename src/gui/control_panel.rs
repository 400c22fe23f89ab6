//! Control Panel Widget
//! Left side panel with workbook upload, exports and progress.

use egui::{Color32, RichText, ScrollArea};
use std::path::PathBuf;

/// Left side control panel with file selection and export controls.
pub struct ControlPanel {
    pub files: Vec<PathBuf>,
    pub progress: f32,
    pub status: String,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            progress: 0.0,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the uploaded file list
    pub fn set_files(&mut self, files: Vec<PathBuf>) {
        self.files = files;
        self.export_enabled = false;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, busy: bool) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📈 MoM Trend")
                    .size(22.0)
                    .color(Color32::from_rgb(0, 122, 204)),
            );
            ui.label(
                RichText::new("Month on Month Summary")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Upload Section =====
        ui.label(RichText::new("📁 Upload Excel Files").size(14.0).strong());
        ui.add_space(5.0);
        ui.label(
            RichText::new("Note: You can upload multiple Excel files at a time.")
                .size(11.0)
                .strong(),
        );
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                if self.files.is_empty() {
                    ui.label(RichText::new("No files selected").size(12.0).color(Color32::GRAY));
                } else {
                    ScrollArea::vertical().max_height(140.0).show(ui, |ui| {
                        for path in &self.files {
                            let name = path
                                .file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_else(|| path.display().to_string());
                            ui.label(RichText::new(name).size(12.0));
                        }
                    });
                }

                ui.add_space(5.0);
                ui.horizontal(|ui| {
                    ui.add_enabled_ui(!busy, |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::UploadFiles;
                        }
                    });
                    ui.add_enabled_ui(!busy && !self.files.is_empty(), |ui| {
                        if ui.button("✖ Clear").clicked() {
                            action = ControlPanelAction::Clear;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export Buttons =====
        ui.label(RichText::new("📤 Export").size(14.0).strong());
        ui.add_space(5.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled && !busy, |ui| {
                let json_button = egui::Button::new(RichText::new("📄 Export JSON").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(json_button).clicked() {
                    action = ControlPanelAction::ExportJson;
                }

                ui.add_space(6.0);

                let chart_button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(chart_button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.progress > 0.0 && self.progress < 100.0),
        );

        ui.add_space(5.0);

        let status_color = if self.status.contains("Error") || self.status.contains("failed") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Complete") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    UploadFiles,
    Clear,
    ExportJson,
    ExportCharts,
}
