//! MoM Trend Main Application
//! Main window with control panel and report viewer.

use crate::gui::{ControlPanel, ControlPanelAction, ReportViewer};
use crate::report::{ReportBuilder, ReportExporter, WorkbookOutcome};
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{info, warn};

/// Processing result from background thread
enum ProcessResult {
    Progress(f32, String),
    Complete(Vec<WorkbookOutcome>),
}

/// Main application window.
pub struct MomTrendApp {
    control_panel: ControlPanel,
    report_viewer: ReportViewer,

    // Async workbook processing
    process_rx: Option<Receiver<ProcessResult>>,
    is_processing: bool,
}

impl MomTrendApp {
    /// Create the app, processing any workbooks passed on the command line.
    pub fn new(_cc: &eframe::CreationContext<'_>, initial_files: Vec<PathBuf>) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(),
            report_viewer: ReportViewer::new(),
            process_rx: None,
            is_processing: false,
        };

        if !initial_files.is_empty() {
            app.start_processing(initial_files);
        }

        app
    }

    /// Handle workbook selection
    fn handle_upload(&mut self) {
        if self.is_processing {
            return;
        }

        if let Some(paths) = rfd::FileDialog::new()
            .add_filter("Excel Files", &["xlsx"])
            .pick_files()
        {
            if !paths.is_empty() {
                self.start_processing(paths);
            }
        }
    }

    /// Summarize workbooks in a background thread
    fn start_processing(&mut self, paths: Vec<PathBuf>) {
        self.report_viewer.clear();
        self.control_panel.set_files(paths.clone());
        self.control_panel.set_progress(5.0, "Reading workbooks...");
        self.is_processing = true;

        let (tx, rx) = channel();
        self.process_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(ProcessResult::Progress(
                20.0,
                format!("Summarizing {} workbook(s)...", paths.len()),
            ));

            let outcomes = ReportBuilder::process_files(&paths);
            let _ = tx.send(ProcessResult::Complete(outcomes));
        });
    }

    /// Check for processing results
    fn check_processing_results(&mut self) {
        // Take the receiver temporarily to avoid borrow issues
        let rx = self.process_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    ProcessResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    ProcessResult::Complete(outcomes) => {
                        let total = outcomes.len();
                        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
                        info!(total, failed, "workbooks processed");

                        let status = if failed == 0 {
                            format!("Complete! {} workbook(s) summarized", total)
                        } else {
                            format!("Complete! {} of {} workbook(s) failed", failed, total)
                        };
                        self.control_panel.set_progress(100.0, &status);
                        self.control_panel.export_enabled = failed < total;

                        self.report_viewer.set_outcomes(outcomes);
                        self.is_processing = false;
                        should_keep_receiver = false;
                    }
                }
            }

            // Put receiver back if still needed
            if should_keep_receiver {
                self.process_rx = Some(rx);
            }
        }
    }

    fn handle_clear(&mut self) {
        self.report_viewer.clear();
        self.control_panel.set_files(Vec::new());
        self.control_panel.set_progress(0.0, "Ready");
    }

    /// Save all outcomes as one JSON file
    fn handle_export_json(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("mom_trend_report.json")
            .save_file()
        else {
            return; // User cancelled
        };

        match ReportExporter::write_json(&self.report_viewer.outcomes, &path) {
            Ok(()) => self
                .control_panel
                .set_progress(100.0, &format!("Complete! JSON saved to {}", path.display())),
            Err(e) => {
                warn!(error = %e, "JSON export failed");
                self.control_panel.set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    /// Render volume charts to PNG in a chosen folder, then open the folder
    fn handle_export_charts(&mut self) {
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };

        self.control_panel.set_progress(10.0, "Rendering charts...");

        let mut written = 0;
        let mut errors = Vec::new();
        for report in self.report_viewer.reports() {
            match ReportExporter::write_volume_chart(report, &dir) {
                Ok(_) => written += 1,
                Err(e) => {
                    warn!(workbook = %report.name, error = %e, "chart export failed");
                    errors.push(format!("{}: {}", report.name, e));
                }
            }
        }

        if errors.is_empty() {
            self.control_panel
                .set_progress(100.0, &format!("Complete! {} chart(s) exported", written));
        } else {
            self.control_panel.set_progress(
                0.0,
                &format!("Error: {} chart(s) failed ({})", errors.len(), errors.join("; ")),
            );
        }

        if written > 0 {
            if let Err(e) = open::that(&dir) {
                warn!(error = %e, "could not open export folder");
            }
        }
    }
}

impl eframe::App for MomTrendApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_processing_results();

        // Request repaint while processing
        if self.is_processing {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, self.is_processing);

                    match action {
                        ControlPanelAction::UploadFiles => self.handle_upload(),
                        ControlPanelAction::Clear => self.handle_clear(),
                        ControlPanelAction::ExportJson => self.handle_export_json(),
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Report Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.report_viewer.show(ui);
        });
    }
}
