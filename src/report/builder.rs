//! Workbook Report Builder
//! Runs the comparison over every feature sheet of a workbook and batches
//! independent workbooks across threads.

use crate::data::{FormatError, LoadError, VolumeSeries, WorkbookLoader};
use crate::stats::{ComparisonEngine, FeatureSummary};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Everything shown for one workbook.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkbookReport {
    /// Display name (file stem)
    pub name: String,
    pub volume: VolumeSeries,
    /// Feature summaries in sheet order
    pub features: Vec<FeatureSummary>,
}

impl WorkbookReport {
    pub fn feature(&self, feature_name: &str) -> Option<&FeatureSummary> {
        self.features.iter().find(|f| f.feature_name == feature_name)
    }

    pub fn feature_names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.feature_name.as_str()).collect()
    }
}

/// Result of processing one input file.
#[derive(Debug)]
pub struct WorkbookOutcome {
    pub path: PathBuf,
    pub name: String,
    pub result: Result<WorkbookReport, LoadError>,
}

/// File stem used as the workbook's display name.
pub fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Insert keyed by feature name. A repeated name replaces the earlier
/// summary but keeps its position.
fn insert_summary(features: &mut Vec<FeatureSummary>, summary: FeatureSummary) {
    match features
        .iter_mut()
        .find(|f| f.feature_name == summary.feature_name)
    {
        Some(existing) => {
            warn!(feature = %summary.feature_name, "duplicate feature name, keeping the later sheet");
            *existing = summary;
        }
        None => features.push(summary),
    }
}

/// Builds workbook reports.
pub struct ReportBuilder;

impl ReportBuilder {
    /// Summaries for every comparable sheet, in sheet order. Sheets without
    /// a significant change are left out.
    pub fn summarize_workbook(loader: &mut WorkbookLoader) -> Vec<FeatureSummary> {
        let mut features: Vec<FeatureSummary> = Vec::new();

        for sheet in loader.comparable_sheets() {
            match ComparisonEngine::summarize_sheet(&sheet) {
                Some(summary) => {
                    debug!(
                        sheet = %sheet.name,
                        points = summary.summary_points.len(),
                        "significant changes found"
                    );
                    insert_summary(&mut features, summary);
                }
                None => debug!(sheet = %sheet.name, "no significant change"),
            }
        }

        features
    }

    /// Volume series plus feature summaries for an opened workbook.
    pub fn build(name: &str, loader: &mut WorkbookLoader) -> Result<WorkbookReport, FormatError> {
        let volume = loader.load_reserved_series()?;
        let features = Self::summarize_workbook(loader);

        info!(
            workbook = %name,
            sheets = loader.list_sheets().len(),
            features = features.len(),
            "workbook summarized"
        );

        Ok(WorkbookReport {
            name: name.to_string(),
            volume,
            features,
        })
    }

    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Result<WorkbookReport, FormatError> {
        let mut loader = WorkbookLoader::from_bytes(bytes)?;
        Self::build(name, &mut loader)
    }

    pub fn from_path(path: &Path) -> Result<WorkbookReport, LoadError> {
        let mut loader = WorkbookLoader::open(path)?;
        Ok(Self::build(&display_name(path), &mut loader)?)
    }

    /// Process workbooks in parallel. Output order matches input order and
    /// a failing workbook never affects the others.
    pub fn process_files(paths: &[PathBuf]) -> Vec<WorkbookOutcome> {
        paths
            .par_iter()
            .map(|path| {
                let result = Self::from_path(path);
                if let Err(e) = &result {
                    warn!(path = %path.display(), error = %e, "workbook failed");
                }

                WorkbookOutcome {
                    path: path.clone(),
                    name: display_name(path),
                    result,
                }
            })
            .collect()
    }
}
