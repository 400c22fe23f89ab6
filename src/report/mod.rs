//! Report module - per-workbook summaries, text rendering and exports

mod builder;
mod export;
mod text;

pub use builder::{ReportBuilder, WorkbookOutcome, WorkbookReport};
pub use export::ReportExporter;
pub use text::ReportFormatter;
