//! Month-over-Month Comparison Module
//! Flags categories whose latest value moved by more than a fixed number of
//! points and phrases each move as a summary sentence.

use crate::data::{CategoryRow, Excerpt, Sheet};
use serde::Serialize;
use std::fmt;

/// Absolute point difference a category must exceed to be reported.
pub const SIGNIFICANCE_THRESHOLD: f64 = 5.0;
/// Most period columns carried into an excerpt
pub const EXCERPT_MAX_PERIODS: usize = 5;
/// Sheets with more categories than this get no excerpt
pub const EXCERPT_MAX_CATEGORIES: usize = 6;

/// Direction of a significant change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increased,
    Decreased,
}

impl Trend {
    pub fn from_difference(difference: f64) -> Self {
        if difference > 0.0 {
            Trend::Increased
        } else {
            Trend::Decreased
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increased => "increased",
            Trend::Decreased => "decreased",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category whose latest value moved past the threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryChange {
    pub category: String,
    pub previous: f64,
    pub latest: f64,
    /// `latest - previous`, in percentage points
    pub difference: f64,
    pub trend: Trend,
    pub latest_period: String,
}

impl CategoryChange {
    /// Magnitude of the change.
    pub fn deviation(&self) -> f64 {
        self.difference.abs()
    }

    /// Deviation with exactly two decimals.
    pub fn deviation_text(&self) -> String {
        format!("{:.2}", self.deviation())
    }

    pub fn narrative(&self) -> String {
        format!(
            "For category {}, number of accounts {} by {}% in {} as compared to the previous month.",
            self.category,
            self.trend,
            self.deviation_text(),
            self.latest_period
        )
    }
}

/// Summary of one feature sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureSummary {
    pub feature_name: String,
    /// One sentence per significant category, in row order
    pub summary_points: Vec<String>,
    pub display_table: bool,
    pub excerpt: Option<Excerpt>,
    pub changes: Vec<CategoryChange>,
}

impl FeatureSummary {
    /// Excerpt to render, if the table is meant to be shown.
    pub fn visible_excerpt(&self) -> Option<&Excerpt> {
        if self.display_table {
            self.excerpt.as_ref()
        } else {
            None
        }
    }
}

/// Compares the two most recent periods of a sheet.
pub struct ComparisonEngine;

impl ComparisonEngine {
    pub fn is_significant(difference: f64) -> bool {
        difference.abs() > SIGNIFICANCE_THRESHOLD
    }

    /// Compare one category between two period positions.
    ///
    /// Returns `None` if either value is missing or the move is within the threshold.
    pub fn compare_category(
        row: &CategoryRow,
        previous: usize,
        latest: usize,
        latest_period: &str,
    ) -> Option<CategoryChange> {
        let latest_value = row.value(latest)?;
        let previous_value = row.value(previous)?;

        let difference = latest_value - previous_value;
        if !Self::is_significant(difference) {
            return None;
        }

        Some(CategoryChange {
            category: row.category.clone(),
            previous: previous_value,
            latest: latest_value,
            difference,
            trend: Trend::from_difference(difference),
            latest_period: latest_period.to_string(),
        })
    }

    /// Excerpt for small sheets only.
    pub fn excerpt_for(sheet: &Sheet) -> Option<Excerpt> {
        if sheet.category_count() <= EXCERPT_MAX_CATEGORIES {
            Some(sheet.excerpt(EXCERPT_MAX_PERIODS))
        } else {
            None
        }
    }

    /// Summarize a sheet. Sheets with fewer than two periods, or with no
    /// significant category, produce nothing.
    pub fn summarize_sheet(sheet: &Sheet) -> Option<FeatureSummary> {
        let (previous, latest) = sheet.latest_pair()?;
        let latest_period = &sheet.periods[latest];

        let changes: Vec<CategoryChange> = sheet
            .rows
            .iter()
            .filter_map(|row| Self::compare_category(row, previous, latest, latest_period))
            .collect();

        let display_table = !changes.is_empty();
        if !display_table {
            return None;
        }

        Some(FeatureSummary {
            feature_name: sheet.feature_name.clone(),
            summary_points: changes.iter().map(CategoryChange::narrative).collect(),
            display_table,
            excerpt: Self::excerpt_for(sheet),
            changes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(periods: &[&str], rows: Vec<(&str, Vec<Option<f64>>)>) -> Sheet {
        Sheet::new(
            "sheet",
            "Churn",
            periods.iter().map(|p| p.to_string()).collect(),
            rows.into_iter()
                .map(|(c, v)| CategoryRow::new(c, v))
                .collect(),
        )
    }

    fn churn(feb_b: f64) -> Sheet {
        sheet(
            &["Jan", "Feb"],
            vec![
                ("A", vec![Some(10.0), Some(10.5)]),
                ("B", vec![Some(20.0), Some(feb_b)]),
            ],
        )
    }

    #[test]
    fn reports_only_the_significant_category() {
        let summary = ComparisonEngine::summarize_sheet(&churn(26.0)).unwrap();

        assert_eq!(summary.feature_name, "Churn");
        assert_eq!(
            summary.summary_points,
            vec!["For category B, number of accounts increased by 6.00% in Feb as compared to the previous month."]
        );
        assert!(summary.display_table);
        assert_eq!(summary.changes.len(), 1);
        assert_eq!(summary.changes[0].trend, Trend::Increased);
    }

    #[test]
    fn no_significant_category_means_no_summary() {
        assert!(ComparisonEngine::summarize_sheet(&churn(24.0)).is_none());
    }

    #[test]
    fn single_period_sheet_is_skipped() {
        let s = sheet(&["Jan"], vec![("A", vec![Some(1.0)])]);
        assert!(ComparisonEngine::summarize_sheet(&s).is_none());

        let none = sheet(&[], vec![("A", vec![])]);
        assert!(ComparisonEngine::summarize_sheet(&none).is_none());
    }

    #[test]
    fn threshold_is_strict() {
        assert!(ComparisonEngine::summarize_sheet(&churn(25.0)).is_none());
        assert!(ComparisonEngine::summarize_sheet(&churn(15.0)).is_none());
        assert!(!ComparisonEngine::is_significant(5.0));
        assert!(!ComparisonEngine::is_significant(-5.0));
        assert!(ComparisonEngine::is_significant(5.01));
        assert!(ComparisonEngine::is_significant(-5.01));
    }

    #[test]
    fn drops_are_reported_as_decreases() {
        let summary = ComparisonEngine::summarize_sheet(&churn(12.75)).unwrap();
        assert_eq!(
            summary.summary_points[0],
            "For category B, number of accounts decreased by 7.25% in Feb as compared to the previous month."
        );
        assert_eq!(summary.changes[0].trend, Trend::Decreased);
        assert_eq!(summary.changes[0].difference, -7.25);
    }

    #[test]
    fn uses_the_last_two_columns_by_position() {
        let s = sheet(
            &["Mar", "Jan", "Feb"],
            vec![("A", vec![Some(50.0), Some(10.0), Some(20.0)])],
        );
        let summary = ComparisonEngine::summarize_sheet(&s).unwrap();
        assert_eq!(summary.changes[0].previous, 10.0);
        assert_eq!(summary.changes[0].latest_period, "Feb");
        assert!(summary.summary_points[0].contains("increased by 10.00% in Feb"));
    }

    #[test]
    fn short_rows_are_skipped_silently() {
        let s = sheet(
            &["Jan", "Feb", "Mar"],
            vec![
                ("A", vec![Some(1.0), Some(2.0)]),
                ("B", vec![Some(1.0), None, Some(90.0)]),
                ("C", vec![Some(0.0), Some(10.0), Some(30.0)]),
            ],
        );
        let summary = ComparisonEngine::summarize_sheet(&s).unwrap();
        assert_eq!(summary.changes.len(), 1);
        assert_eq!(summary.changes[0].category, "C");
    }

    #[test]
    fn only_short_rows_yield_no_summary() {
        let s = sheet(&["Jan", "Feb"], vec![("A", vec![Some(1.0)])]);
        assert!(ComparisonEngine::summarize_sheet(&s).is_none());
    }

    #[test]
    fn narratives_follow_row_order() {
        let s = sheet(
            &["Jan", "Feb"],
            vec![
                ("Zeta", vec![Some(50.0), Some(40.0)]),
                ("Alpha", vec![Some(10.0), Some(30.0)]),
            ],
        );
        let summary = ComparisonEngine::summarize_sheet(&s).unwrap();
        assert!(summary.summary_points[0].starts_with("For category Zeta,"));
        assert!(summary.summary_points[1].starts_with("For category Alpha,"));
    }

    #[test]
    fn deviation_always_has_two_decimals() {
        let change = CategoryChange {
            category: "A".into(),
            previous: 0.0,
            latest: 6.0,
            difference: 6.0,
            trend: Trend::Increased,
            latest_period: "Feb".into(),
        };
        assert_eq!(change.deviation_text(), "6.00");

        let s = sheet(&["Jan", "Feb"], vec![("A", vec![Some(1.0), Some(7.129)])]);
        let summary = ComparisonEngine::summarize_sheet(&s).unwrap();
        assert!(summary.summary_points[0].contains("by 6.13%"));
    }

    #[test]
    fn excerpt_present_only_for_small_sheets() {
        let periods = ["M1", "M2", "M3", "M4", "M5", "M6", "M7"];
        let row = |c| (c, vec![Some(0.0), Some(0.0), Some(0.0), Some(0.0), Some(0.0), Some(0.0), Some(10.0)]);

        let small = sheet(&periods, vec![row("A"), row("B")]);
        let summary = ComparisonEngine::summarize_sheet(&small).unwrap();
        let excerpt = summary.excerpt.as_ref().unwrap();
        assert_eq!(excerpt.column_count(), 1 + 5);
        assert_eq!(excerpt.columns, vec!["Churn", "M3", "M4", "M5", "M6", "M7"]);
        assert!(summary.visible_excerpt().is_some());

        let six = sheet(&periods, ["A", "B", "C", "D", "E", "F"].map(row).to_vec());
        assert!(ComparisonEngine::summarize_sheet(&six).unwrap().excerpt.is_some());

        let seven = sheet(&periods, ["A", "B", "C", "D", "E", "F", "G"].map(row).to_vec());
        assert!(ComparisonEngine::summarize_sheet(&seven).unwrap().excerpt.is_none());
    }

    #[test]
    fn excerpt_width_tracks_short_period_lists() {
        let excerpt = ComparisonEngine::excerpt_for(&churn(30.0)).unwrap();
        assert_eq!(excerpt.column_count(), 1 + 2);
    }

    #[test]
    fn summarizing_is_idempotent() {
        let s = churn(40.0);
        let first = ComparisonEngine::summarize_sheet(&s);
        let second = ComparisonEngine::summarize_sheet(&s);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
