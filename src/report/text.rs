//! Plain-text rendering of workbook reports for the terminal.

use super::builder::WorkbookReport;
use crate::data::{format_number, Excerpt};

const RULE_WIDTH: usize = 60;

/// Renders reports as plain text.
pub struct ReportFormatter;

impl ReportFormatter {
    /// Banner, volume listing, then each feature's bullets and table.
    pub fn render(report: &WorkbookReport) -> String {
        let mut out = String::new();

        let rule = "=".repeat(RULE_WIDTH);
        out.push_str(&format!("{}\n", rule));
        out.push_str(&format!("{:^width$}\n", report.name, width = RULE_WIDTH));
        out.push_str(&format!("{}\n", rule));
        out.push('\n');

        out.push_str("Month on Month Volume Trend\n");
        if report.volume.is_empty() {
            out.push_str("  (no volume data)\n");
        }
        for point in &report.volume.points {
            let count = point
                .account_count
                .map(format_number)
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!("  {}: {}\n", point.month_year, count));
        }
        out.push('\n');

        out.push_str("Summary\n");
        if report.features.is_empty() {
            out.push_str("  No significant month-over-month changes.\n");
        }
        for feature in &report.features {
            out.push_str(&format!("{}:\n", feature.feature_name));
            for point in &feature.summary_points {
                out.push_str(&format!("- {}\n", point));
            }
            if let Some(excerpt) = feature.visible_excerpt() {
                out.push('\n');
                out.push_str(&Self::render_table(excerpt));
            }
            out.push('\n');
        }

        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push('\n');
        out
    }

    /// Left-aligned text table; values to two decimals, blanks as empty cells.
    pub fn render_table(excerpt: &Excerpt) -> String {
        let mut grid: Vec<Vec<String>> = Vec::with_capacity(excerpt.rows.len() + 1);
        grid.push(excerpt.columns.clone());
        for row in &excerpt.rows {
            let mut cells = vec![row.category.clone()];
            cells.extend(
                (0..excerpt.period_labels().len())
                    .map(|i| row.value(i).map(|v| format!("{:.2}", v)).unwrap_or_default()),
            );
            grid.push(cells);
        }

        let widths: Vec<usize> = (0..excerpt.column_count())
            .map(|c| {
                grid.iter()
                    .map(|r| r.get(c).map(|s| s.chars().count()).unwrap_or(0))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        for (r, cells) in grid.iter().enumerate() {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
                .collect();
            out.push_str(&format!("  | {} |\n", line.join(" | ")));

            if r == 0 {
                let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
                out.push_str(&format!("  |-{}-|\n", sep.join("-|-")));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CategoryRow, Sheet, VolumePoint, VolumeSeries};
    use crate::stats::ComparisonEngine;

    fn report() -> WorkbookReport {
        let sheet = Sheet::new(
            "Churn",
            "Churn",
            vec!["Jan".into(), "Feb".into()],
            vec![
                CategoryRow::new("A", vec![Some(10.0), Some(10.5)]),
                CategoryRow::new("B", vec![Some(20.0), Some(26.0)]),
            ],
        );

        WorkbookReport {
            name: "monthly".into(),
            volume: VolumeSeries {
                points: vec![
                    VolumePoint { month_year: "Jan".into(), account_count: Some(1000.0) },
                    VolumePoint { month_year: "Feb".into(), account_count: None },
                ],
            },
            features: vec![ComparisonEngine::summarize_sheet(&sheet).unwrap()],
        }
    }

    #[test]
    fn text_report_has_all_sections() {
        let text = ReportFormatter::render(&report());

        assert!(text.contains("monthly"));
        assert!(text.contains("Month on Month Volume Trend"));
        assert!(text.contains("  Jan: 1000\n"));
        assert!(text.contains("  Feb: -\n"));
        assert!(text.contains("Churn:\n- For category B, number of accounts increased by 6.00% in Feb"));
        assert!(text.contains("| Churn | Jan   | Feb   |"));
        assert!(text.contains("| B     | 20.00 | 26.00 |"));
    }

    #[test]
    fn empty_summary_is_stated() {
        let mut r = report();
        r.features.clear();
        let text = ReportFormatter::render(&r);
        assert!(text.contains("No significant month-over-month changes."));
    }

    #[test]
    fn table_leaves_missing_values_blank() {
        let excerpt = Excerpt {
            columns: vec!["Plan".into(), "Jan".into()],
            rows: vec![CategoryRow::new("Gold", vec![None])],
        };
        let table = ReportFormatter::render_table(&excerpt);
        assert!(table.contains("| Gold |     |"));
    }
}
