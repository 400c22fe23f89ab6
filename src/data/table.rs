//! Normalized Sheet Tables
//! Category × period tables cut from workbook sheets, plus the reserved volume series.

use polars::prelude::*;
use serde::Serialize;

/// One row of a feature sheet: a category label and its values by period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    pub category: String,
    /// At most one entry per period. Trailing blank cells are not stored,
    /// so a row can be shorter than the sheet's period list.
    pub values: Vec<Option<f64>>,
}

impl CategoryRow {
    pub fn new(category: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            category: category.into(),
            values,
        }
    }

    /// Value at a period index, or `None` when the cell is blank,
    /// non-numeric, or past the end of a short row.
    pub fn value(&self, period: usize) -> Option<f64> {
        self.values.get(period).copied().flatten()
    }
}

/// A feature sheet: category column followed by period columns, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Sheet tab name in the workbook
    pub name: String,
    /// Header of the category column
    pub feature_name: String,
    /// Period labels in column order
    pub periods: Vec<String>,
    pub rows: Vec<CategoryRow>,
}

impl Sheet {
    /// Build a sheet. Row values beyond the period list are dropped.
    pub fn new(
        name: impl Into<String>,
        feature_name: impl Into<String>,
        periods: Vec<String>,
        mut rows: Vec<CategoryRow>,
    ) -> Self {
        for row in &mut rows {
            row.values.truncate(periods.len());
        }

        Self {
            name: name.into(),
            feature_name: feature_name.into(),
            periods,
            rows,
        }
    }

    pub fn period_count(&self) -> usize {
        self.periods.len()
    }

    pub fn category_count(&self) -> usize {
        self.rows.len()
    }

    /// Indices of the previous and latest period columns, by position.
    pub fn latest_pair(&self) -> Option<(usize, usize)> {
        let n = self.periods.len();
        if n < 2 {
            None
        } else {
            Some((n - 2, n - 1))
        }
    }

    /// Category column plus the last `max_periods` period columns.
    pub fn excerpt(&self, max_periods: usize) -> Excerpt {
        let start = self.periods.len().saturating_sub(max_periods);

        let mut columns = Vec::with_capacity(1 + self.periods.len() - start);
        columns.push(self.feature_name.clone());
        columns.extend(self.periods[start..].iter().cloned());

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let values = (start..self.periods.len()).map(|i| row.value(i)).collect();
                CategoryRow::new(row.category.clone(), values)
            })
            .collect();

        Excerpt { columns, rows }
    }
}

/// Sub-table shown next to a feature's narrative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Excerpt {
    /// Category header first, then period labels
    pub columns: Vec<String>,
    pub rows: Vec<CategoryRow>,
}

impl Excerpt {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn period_labels(&self) -> &[String] {
        self.columns.get(1..).unwrap_or(&[])
    }

    /// Convert to a DataFrame (category column as strings, periods as f64).
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let Some(category_header) = self.columns.first() else {
            return Ok(DataFrame::empty());
        };

        let categories: Vec<String> = self.rows.iter().map(|r| r.category.clone()).collect();
        let mut columns = vec![Column::new(category_header.as_str().into(), categories)];

        for (idx, label) in self.period_labels().iter().enumerate() {
            let values: Vec<Option<f64>> = self.rows.iter().map(|r| r.value(idx)).collect();
            columns.push(Column::new(label.as_str().into(), values));
        }

        DataFrame::new(columns)
    }
}

/// One point of the reserved month-over-month volume sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumePoint {
    pub month_year: String,
    pub account_count: Option<f64>,
}

/// The reserved volume series, in sheet row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VolumeSeries {
    pub points: Vec<VolumePoint>,
}

impl VolumeSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn labels(&self) -> Vec<String> {
        self.points.iter().map(|p| p.month_year.clone()).collect()
    }

    /// Points with a count, as (position, count).
    pub fn plottable(&self) -> Vec<(usize, f64)> {
        self.points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.account_count.map(|c| (i, c)))
            .collect()
    }

    /// (min, max) over present counts.
    pub fn count_range(&self) -> Option<(f64, f64)> {
        self.plottable().into_iter().fold(None, |acc, (_, c)| match acc {
            None => Some((c, c)),
            Some((lo, hi)) => Some((lo.min(c), hi.max(c))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn churn() -> Sheet {
        Sheet::new(
            "churn",
            "Churn",
            vec!["Jan".into(), "Feb".into(), "Mar".into()],
            vec![
                CategoryRow::new("A", vec![Some(1.0), Some(2.0), Some(3.0)]),
                CategoryRow::new("B", vec![Some(4.0)]),
            ],
        )
    }

    #[test]
    fn short_rows_read_as_absent() {
        let sheet = churn();
        assert_eq!(sheet.rows[1].value(0), Some(4.0));
        assert_eq!(sheet.rows[1].value(2), None);
        assert_eq!(sheet.rows[0].value(7), None);
    }

    #[test]
    fn values_past_the_period_list_are_dropped() {
        let sheet = Sheet::new(
            "s",
            "F",
            vec!["Jan".into()],
            vec![CategoryRow::new("A", vec![Some(1.0), Some(2.0)])],
        );
        assert_eq!(sheet.rows[0].values, vec![Some(1.0)]);
    }

    #[test]
    fn latest_pair_is_positional() {
        assert_eq!(churn().latest_pair(), Some((1, 2)));

        let single = Sheet::new("s", "F", vec!["Jan".into()], vec![]);
        assert_eq!(single.latest_pair(), None);
    }

    #[test]
    fn excerpt_keeps_trailing_periods() {
        let excerpt = churn().excerpt(2);
        assert_eq!(excerpt.columns, vec!["Churn", "Feb", "Mar"]);
        assert_eq!(excerpt.rows[0].values, vec![Some(2.0), Some(3.0)]);
        assert_eq!(excerpt.rows[1].values, vec![None, None]);

        let wide = churn().excerpt(10);
        assert_eq!(wide.column_count(), 4);
    }

    #[test]
    fn excerpt_converts_to_dataframe() {
        let df = churn().excerpt(5).to_dataframe().unwrap();
        assert_eq!(df.width(), 4);
        assert_eq!(df.height(), 2);
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["Churn", "Jan", "Feb", "Mar"]);
        assert_eq!(df.column("Feb").unwrap().null_count(), 1);
    }

    #[test]
    fn volume_series_skips_missing_counts() {
        let series = VolumeSeries {
            points: vec![
                VolumePoint { month_year: "Jan".into(), account_count: Some(10.0) },
                VolumePoint { month_year: "Feb".into(), account_count: None },
                VolumePoint { month_year: "Mar".into(), account_count: Some(4.0) },
            ],
        };
        assert_eq!(series.plottable(), vec![(0, 10.0), (2, 4.0)]);
        assert_eq!(series.count_range(), Some((4.0, 10.0)));
        assert_eq!(series.labels(), vec!["Jan", "Feb", "Mar"]);
    }
}
