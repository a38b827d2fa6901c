//! Time Series Module
//! Category filtering and per-category line extraction.

use super::export::{frame_to_csv, ExportError};
use super::loader::{CATEGORY_COL, PERIOD_COL, VALUE_COL};
use chrono::NaiveDate;
use polars::prelude::*;

/// One observation of the time-series file.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesRow {
    pub period: NaiveDate,
    pub value: Option<f64>,
    pub risk_category: String,
}

/// Chronologically sorted time-series rows.
#[derive(Debug, Clone, Default)]
pub struct TimeSeries {
    rows: Vec<TimeSeriesRow>,
    categories: Vec<String>,
}

/// Points of one category, ordered by date and split at missing values.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryLine {
    pub category: String,
    pub segments: Vec<Vec<(NaiveDate, f64)>>,
}

impl TimeSeries {
    /// Rows must already be sorted by period.
    pub fn new(rows: Vec<TimeSeriesRow>) -> Self {
        let mut categories: Vec<String> = Vec::new();
        for row in &rows {
            if !categories.contains(&row.risk_category) {
                categories.push(row.risk_category.clone());
            }
        }
        Self { rows, categories }
    }

    pub fn rows(&self) -> &[TimeSeriesRow] {
        &self.rows
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// First and last date covered.
    pub fn date_extent(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.rows.first()?.period, self.rows.last()?.period))
    }

    /// Rows whose category is selected, in chronological order.
    pub fn filter(&self, selected: &[String]) -> Vec<&TimeSeriesRow> {
        self.rows
            .iter()
            .filter(|row| selected.contains(&row.risk_category))
            .collect()
    }

    /// One line per selected category, in selection order. A missing value
    /// ends the current segment, so the chart shows a gap there.
    pub fn lines(&self, selected: &[String]) -> Vec<CategoryLine> {
        selected
            .iter()
            .map(|category| {
                let mut segments = Vec::new();
                let mut current = Vec::new();
                for row in self.rows.iter().filter(|row| &row.risk_category == category) {
                    match row.value {
                        Some(value) => current.push((row.period, value)),
                        None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                        None => {}
                    }
                }
                if !current.is_empty() {
                    segments.push(current);
                }
                CategoryLine {
                    category: category.clone(),
                    segments,
                }
            })
            .collect()
    }

    /// Filtered rows as a DataFrame with the normalized column names.
    pub fn filtered_frame(&self, selected: &[String]) -> PolarsResult<DataFrame> {
        let rows = self.filter(selected);
        let periods: Vec<String> = rows
            .iter()
            .map(|r| r.period.format("%Y-%m-%d").to_string())
            .collect();
        let values: Vec<Option<f64>> = rows.iter().map(|r| r.value).collect();
        let categories: Vec<String> = rows.iter().map(|r| r.risk_category.clone()).collect();

        DataFrame::new(vec![
            Column::new(PERIOD_COL.into(), periods),
            Column::new(VALUE_COL.into(), values),
            Column::new(CATEGORY_COL.into(), categories),
        ])
    }

    /// CSV export of exactly the filtered view.
    pub fn export_csv(&self, selected: &[String]) -> Result<Vec<u8>, ExportError> {
        let mut df = self.filtered_frame(selected)?;
        frame_to_csv(&mut df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, value: Option<f64>, category: &str) -> TimeSeriesRow {
        TimeSeriesRow {
            period: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            value,
            risk_category: category.to_string(),
        }
    }

    fn sample() -> TimeSeries {
        TimeSeries::new(vec![
            row("2020-01-31", Some(1.0), "Interest rate"),
            row("2020-01-31", Some(10.0), "Foreign exchange"),
            row("2020-02-29", None, "Interest rate"),
            row("2020-03-31", Some(3.0), "Interest rate"),
            row("2020-03-31", Some(30.0), "Credit"),
        ])
    }

    #[test]
    fn categories_keep_first_seen_order() {
        let ts = sample();
        assert_eq!(ts.categories(), ["Interest rate", "Foreign exchange", "Credit"]);
    }

    #[test]
    fn lines_follow_selection_and_break_at_missing_values() {
        let ts = sample();
        let selected = vec!["Credit".to_string(), "Interest rate".to_string()];
        let lines = ts.lines(&selected);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].category, "Credit");
        assert_eq!(lines[0].segments.len(), 1);

        let date = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        assert_eq!(
            lines[1].segments,
            vec![
                vec![(date("2020-01-31"), 1.0)],
                vec![(date("2020-03-31"), 3.0)],
            ]
        );
    }

    #[test]
    fn leading_and_trailing_missing_values_add_no_segments() {
        let ts = TimeSeries::new(vec![
            row("2020-01-31", None, "Credit"),
            row("2020-02-29", Some(2.0), "Credit"),
            row("2020-03-31", Some(3.0), "Credit"),
            row("2020-04-30", None, "Credit"),
        ]);
        let lines = ts.lines(&["Credit".to_string()]);
        assert_eq!(lines[0].segments.len(), 1);
        assert_eq!(lines[0].segments[0].len(), 2);
    }

    #[test]
    fn empty_selection_yields_empty_chart_and_export() {
        let ts = sample();
        assert!(ts.lines(&[]).is_empty());
        assert!(ts.filter(&[]).is_empty());

        let csv = String::from_utf8(ts.export_csv(&[]).unwrap()).unwrap();
        assert_eq!(csv.lines().count(), 1);
        assert_eq!(csv.lines().next(), Some("period,value,risk category"));
    }

    #[test]
    fn export_matches_filtered_rows() {
        let ts = sample();
        let csv = String::from_utf8(ts.export_csv(&["Interest rate".to_string()]).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "2020-01-31,1.0,Interest rate");
        assert_eq!(lines[2], "2020-02-29,,Interest rate");
    }

    #[test]
    fn date_extent_spans_sorted_rows() {
        let (start, end) = sample().date_extent().unwrap();
        assert_eq!(start.to_string(), "2020-01-31");
        assert_eq!(end.to_string(), "2020-03-31");
        assert!(TimeSeries::default().date_extent().is_none());
    }
}
