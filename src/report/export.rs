//! Report Export Module
//! Writes reports as JSON, excerpts as CSV, and volume charts as PNG.

use super::builder::{WorkbookOutcome, WorkbookReport};
use crate::charts::{ChartError, VolumeChartRenderer, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use polars::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a WorkbookReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Replace anything but alphanumerics, `_` and `-` so names are safe as file names.
pub fn safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Writes report artifacts to disk.
pub struct ReportExporter;

impl ReportExporter {
    /// All outcomes as one pretty-printed JSON array; failures carry their error text.
    pub fn write_json(outcomes: &[WorkbookOutcome], path: &Path) -> Result<(), ExportError> {
        let entries: Vec<JsonEntry> = outcomes
            .iter()
            .map(|o| JsonEntry {
                file: o.path.to_string_lossy().to_string(),
                report: o.result.as_ref().ok(),
                error: o.result.as_ref().err().map(|e| e.to_string()),
            })
            .collect();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &entries)?;

        info!(path = %path.display(), workbooks = outcomes.len(), "JSON report written");
        Ok(())
    }

    /// One CSV per feature whose table is displayed.
    pub fn write_excerpts(report: &WorkbookReport, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::new();

        for feature in &report.features {
            let Some(excerpt) = feature.visible_excerpt() else {
                continue;
            };

            let file_path = dir.join(format!(
                "{}_{}.csv",
                safe_file_name(&report.name),
                safe_file_name(&feature.feature_name)
            ));

            let mut df = excerpt.to_dataframe()?;
            let mut file = File::create(&file_path)?;
            CsvWriter::new(&mut file).include_header(true).finish(&mut df)?;

            written.push(file_path);
        }

        info!(workbook = %report.name, files = written.len(), "excerpts written");
        Ok(written)
    }

    /// Volume chart PNG, named after the workbook.
    pub fn write_volume_chart(report: &WorkbookReport, dir: &Path) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(dir)?;
        let file_path = dir.join(format!("{}_mom_volume.png", safe_file_name(&report.name)));

        VolumeChartRenderer::save_png(&report.volume, &file_path, DEFAULT_WIDTH, DEFAULT_HEIGHT)?;

        info!(path = %file_path.display(), "volume chart written");
        Ok(file_path)
    }
}
