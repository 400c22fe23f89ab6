//! Workbook Loader Module
//! Opens Excel workbooks with calamine and hands out normalized sheets.

use super::normalizer;
use super::table::{Sheet, VolumeSeries};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Sheet holding the month-over-month volume series. Never compared.
pub const RESERVED_SHEET: &str = "MoM_volume";
/// Period-label column of the reserved sheet
pub const PERIOD_COLUMN: &str = "month_year";
/// Count column of the reserved sheet
pub const COUNT_COLUMN: &str = "account_count";

/// The input is not a usable workbook, or a sheet does not have the expected shape.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Failed to open workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Failed to read sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        source: calamine::Error,
    },
    #[error("Sheet '{0}' not found")]
    MissingSheet(String),
    #[error("Sheet '{0}' is empty")]
    EmptySheet(String),
    #[error("Sheet '{sheet}' has {columns} column(s), need a category column and at least one period")]
    TooFewColumns { sheet: String, columns: usize },
    #[error("Sheet '{sheet}' has no '{column}' column")]
    MissingColumn { sheet: String, column: String },
    #[error("Sheet '{0}' holds the volume series and is not a feature sheet")]
    ReservedSheet(String),
}

/// Failure to get a workbook off disk and parsed.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Parsed workbook with its sheet names in file order.
pub struct WorkbookLoader {
    workbook: Sheets<Cursor<Vec<u8>>>,
    sheet_names: Vec<String>,
}

impl WorkbookLoader {
    /// Parse a workbook from raw bytes (xlsx, xls, xlsb or ods).
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, FormatError> {
        let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        let sheet_names = workbook.sheet_names().to_vec();

        Ok(Self {
            workbook,
            sheet_names,
        })
    }

    /// Read a workbook file and parse it.
    pub fn open(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::from_bytes(bytes)?)
    }

    /// Sheet names in file order.
    pub fn list_sheets(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn is_reserved(name: &str) -> bool {
        name == RESERVED_SHEET
    }

    fn read_range(&mut self, name: &str) -> Result<Range<Data>, FormatError> {
        if !self.sheet_names.iter().any(|s| s == name) {
            return Err(FormatError::MissingSheet(name.to_string()));
        }

        self.workbook
            .worksheet_range(name)
            .map_err(|source| FormatError::Sheet {
                sheet: name.to_string(),
                source,
            })
    }

    /// Load a feature sheet as category × period table.
    pub fn load_sheet(&mut self, name: &str) -> Result<Sheet, FormatError> {
        if Self::is_reserved(name) {
            return Err(FormatError::ReservedSheet(name.to_string()));
        }

        let range = self.read_range(name)?;
        normalizer::sheet_from_rows(name, range.rows())
    }

    /// Load the reserved volume series by its fixed sheet and column names.
    pub fn load_reserved_series(&mut self) -> Result<VolumeSeries, FormatError> {
        let range = self.read_range(RESERVED_SHEET)?;
        normalizer::volume_from_rows(RESERVED_SHEET, range.rows())
    }

    /// Every non-reserved sheet that loads, in file order. Sheets that fail
    /// to load carry nothing comparable and are skipped.
    pub fn comparable_sheets(&mut self) -> Vec<Sheet> {
        let names: Vec<String> = self
            .sheet_names
            .iter()
            .filter(|name| !Self::is_reserved(name))
            .cloned()
            .collect();

        names
            .iter()
            .filter_map(|name| match self.load_sheet(name) {
                Ok(sheet) => Some(sheet),
                Err(e) => {
                    debug!(sheet = %name, error = %e, "skipping sheet");
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    /// Cell content for building test workbooks.
    pub enum Cell {
        Text(&'static str),
        Num(f64),
        /// (year, month, day) written as a real Excel date
        Date(u16, u8, u8),
        Blank,
    }

    pub use Cell::{Blank, Date, Num, Text};

    /// Build an xlsx in memory from (sheet name, rows) pairs.
    pub fn workbook_bytes(sheets: &[(&str, Vec<Vec<Cell>>)]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let date_format = Format::new().set_num_format("mmm-yy");

        for (name, rows) in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(*name).unwrap();

            for (r, row) in rows.iter().enumerate() {
                for (c, cell) in row.iter().enumerate() {
                    match cell {
                        Cell::Text(s) => {
                            worksheet.write_string(r as u32, c as u16, *s).unwrap();
                        }
                        Cell::Num(n) => {
                            worksheet.write_number(r as u32, c as u16, *n).unwrap();
                        }
                        Cell::Date(y, m, d) => {
                            let date = ExcelDateTime::from_ymd(*y, *m, *d).unwrap();
                            worksheet
                                .write_datetime_with_format(r as u32, c as u16, &date, &date_format)
                                .unwrap();
                        }
                        Cell::Blank => {}
                    }
                }
            }
        }

        workbook.save_to_buffer().unwrap()
    }

    pub fn volume_sheet() -> (&'static str, Vec<Vec<Cell>>) {
        (
            "MoM_volume",
            vec![
                vec![Text("month_year"), Text("account_count")],
                vec![Text("Jan"), Num(1000.0)],
                vec![Text("Feb"), Num(1100.0)],
            ],
        )
    }

    pub fn churn_sheet(feb_b: f64) -> (&'static str, Vec<Vec<Cell>>) {
        (
            "Churn",
            vec![
                vec![Text("Churn"), Text("Jan"), Text("Feb")],
                vec![Text("A"), Num(10.0), Num(10.5)],
                vec![Text("B"), Num(20.0), Num(feb_b)],
            ],
        )
    }
}
