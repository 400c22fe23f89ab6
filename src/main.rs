//! MoM Trend - Month-over-month workbook summaries & volume chart viewer
//!
//! Reads Excel workbooks whose sheets track categories over months, reports
//! the categories that moved significantly between the last two months, and
//! charts the reserved monthly volume sheet.

mod charts;
mod cli;
mod data;
mod gui;
mod report;
mod stats;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use cli::Cli;
use eframe::egui;
use gui::MomTrendApp;
use std::io::{self, Write};
use report::{ReportBuilder, ReportExporter, ReportFormatter};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.is_headless() {
        return run_headless(&cli, &mut io::stdout().lock());
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([960.0, 640.0])
            .with_title("MoM Trend"),
        ..Default::default()
    };

    // Run the application
    let files = cli.files;
    eframe::run_native(
        "MoM Trend",
        options,
        Box::new(move |cc| Ok(Box::new(MomTrendApp::new(cc, files)))),
    )
    .map_err(|e| anyhow!("viewer failed: {}", e))
}

/// Summarize workbooks without a window: text to `out`, optional exports.
///
/// Export failures are logged per workbook and do not stop the remaining
/// workbooks or the JSON report; they only decide the exit status.
fn run_headless<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    if cli.files.is_empty() {
        bail!("no workbooks given");
    }

    let outcomes = ReportBuilder::process_files(&cli.files);
    let mut export_failures = 0;

    for outcome in &outcomes {
        let report = match &outcome.result {
            Ok(report) => report,
            Err(e) => {
                eprintln!("{}: {}", outcome.path.display(), e);
                continue;
            }
        };

        write!(out, "{}", ReportFormatter::render(report))?;

        if let Some(dir) = &cli.charts {
            if let Err(e) = ReportExporter::write_volume_chart(report, dir) {
                warn!(workbook = %report.name, dir = %dir.display(), error = %e, "chart export failed");
                export_failures += 1;
            }
        }

        if let Some(dir) = &cli.excerpts {
            if let Err(e) = ReportExporter::write_excerpts(report, dir) {
                warn!(workbook = %report.name, dir = %dir.display(), error = %e, "excerpt export failed");
                export_failures += 1;
            }
        }
    }

    if let Some(path) = &cli.json {
        ReportExporter::write_json(&outcomes, path)
            .with_context(|| format!("writing JSON report to {}", path.display()))?;
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    info!(total = outcomes.len(), failed, export_failures, "done");

    if failed == outcomes.len() {
        bail!("none of the {} workbook(s) could be summarized", failed);
    }
    if export_failures > 0 {
        bail!("{} export(s) failed", export_failures);
    }
    Ok(())
}
