//! Command line options.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mom_trend")]
#[command(version, about = "Month-over-month trend summaries for Excel workbooks", long_about = None)]
pub struct Cli {
    /// Workbooks to summarize. Opens the viewer with them unless running headless.
    pub files: Vec<PathBuf>,

    /// Print text reports to stdout instead of opening the viewer
    #[arg(long)]
    pub headless: bool,

    /// Write all reports to a JSON file
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Write one volume chart PNG per workbook into this directory
    #[arg(long, value_name = "DIR")]
    pub charts: Option<PathBuf>,

    /// Write displayed excerpt tables as CSV into this directory
    #[arg(long, value_name = "DIR")]
    pub excerpts: Option<PathBuf>,
}

impl Cli {
    /// Any export flag implies headless mode.
    pub fn is_headless(&self) -> bool {
        self.headless || self.json.is_some() || self.charts.is_some() || self.excerpts.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_alone_open_the_viewer() {
        let cli = Cli::try_parse_from(["mom_trend", "a.xlsx", "b.xlsx"]).unwrap();
        assert_eq!(cli.files.len(), 2);
        assert!(!cli.is_headless());
    }

    #[test]
    fn export_flags_imply_headless() {
        let cli = Cli::try_parse_from(["mom_trend", "a.xlsx", "--json", "out.json"]).unwrap();
        assert!(cli.is_headless());
        assert_eq!(cli.json, Some(PathBuf::from("out.json")));

        let cli = Cli::try_parse_from(["mom_trend", "--headless", "a.xlsx"]).unwrap();
        assert!(cli.is_headless());
    }
}
