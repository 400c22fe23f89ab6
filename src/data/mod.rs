//! Data module - workbook loading and sheet normalization

mod loader;
mod normalizer;
mod table;

#[cfg(test)]
pub(crate) use loader::fixtures;
pub use loader::{FormatError, LoadError, WorkbookLoader};
pub use normalizer::format_number;
pub use table::{CategoryRow, Excerpt, Sheet, VolumePoint, VolumeSeries};
