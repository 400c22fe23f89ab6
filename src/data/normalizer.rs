//! Sheet Normalizer
//! Turns raw calamine cell rows into category × period tables.

use super::loader::{FormatError, COUNT_COLUMN, PERIOD_COLUMN};
use super::table::{CategoryRow, Sheet, VolumePoint, VolumeSeries};
use calamine::Data;
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Render a cell as a label. Blank cells yield `None`.
pub fn cell_label(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => {
            if s.is_empty() {
                None
            } else {
                Some(s.clone())
            }
        }
        Data::Float(n) => Some(format_number(*n)),
        Data::Int(n) => Some(n.to_string()),
        Data::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        Data::DateTime(dt) => Some(match dt.as_datetime() {
            Some(ts) => timestamp_label(&ts),
            None => format_number(dt.as_f64()),
        }),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Error(e) => Some(format!("#{:?}", e)),
    }
}

/// Date headers keep their time part, even at midnight.
fn timestamp_label(ts: &NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Numeric value of a cell. Only integer and float cells count.
pub fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(n) => Some(*n),
        Data::Int(n) => Some(*n as f64),
        _ => None,
    }
}

/// Integral values print without decimals.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Header labels for every column of the used range.
///
/// Blank headers become `Unnamed: {index}`; repeated labels get a `.N` suffix
/// so every column stays addressable.
pub fn header_labels(row: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    row.iter()
        .enumerate()
        .map(|(idx, cell)| {
            let label = cell_label(cell).unwrap_or_else(|| format!("Unnamed: {}", idx));
            let count = seen.entry(label.clone()).or_insert(0);
            let unique = if *count == 0 {
                label
            } else {
                format!("{}.{}", label, count)
            };
            *count += 1;
            unique
        })
        .collect()
}

fn is_blank_row(row: &[Data]) -> bool {
    row.iter().all(|cell| matches!(cell, Data::Empty))
}

/// Normalize a feature sheet. The first row is the header.
pub fn sheet_from_rows<'a, I>(name: &str, rows: I) -> Result<Sheet, FormatError>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows.into_iter();
    let header = rows
        .next()
        .ok_or_else(|| FormatError::EmptySheet(name.to_string()))?;

    let columns = header_labels(header);
    if columns.len() < 2 {
        return Err(FormatError::TooFewColumns {
            sheet: name.to_string(),
            columns: columns.len(),
        });
    }

    let mut labels = columns.into_iter();
    let feature_name = labels.next().unwrap_or_default();
    let periods: Vec<String> = labels.collect();

    let category_rows = rows
        .filter(|row| !is_blank_row(row))
        .map(|row| {
            let category = row.first().and_then(cell_label).unwrap_or_default();
            let mut values: Vec<Option<f64>> = row.iter().skip(1).map(cell_number).collect();
            while matches!(values.last(), Some(None)) {
                values.pop();
            }
            CategoryRow::new(category, values)
        })
        .collect();

    Ok(Sheet::new(name, feature_name, periods, category_rows))
}

/// Pull the period-label and count columns out of the reserved sheet.
pub fn volume_from_rows<'a, I>(name: &str, rows: I) -> Result<VolumeSeries, FormatError>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows.into_iter();
    let header = rows
        .next()
        .ok_or_else(|| FormatError::EmptySheet(name.to_string()))?;
    let columns = header_labels(header);

    let position = |column: &str| {
        columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| FormatError::MissingColumn {
                sheet: name.to_string(),
                column: column.to_string(),
            })
    };
    let period_idx = position(PERIOD_COLUMN)?;
    let count_idx = position(COUNT_COLUMN)?;

    let points = rows
        .filter(|row| !is_blank_row(row))
        .map(|row| VolumePoint {
            month_year: row.get(period_idx).and_then(cell_label).unwrap_or_default(),
            account_count: row.get(count_idx).and_then(cell_number),
        })
        .collect();

    Ok(VolumeSeries { points })
}
