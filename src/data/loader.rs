//! Data Loader Module
//! Handles CSV/XLSX loading, column normalization and date parsing using Polars.

use super::geo::{GeoRow, GeoTable};
use super::timeseries::{TimeSeries, TimeSeriesRow};
use super::drilldown::CurrencyUrlEntry;
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Time column of the time-series file (after normalization).
pub const PERIOD_COL: &str = "period";
/// Numeric column of the time-series file.
pub const VALUE_COL: &str = "value";
/// Category column of the time-series file.
pub const CATEGORY_COL: &str = "risk category";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to read spreadsheet: {0}")]
    SpreadsheetError(#[from] calamine::Error),
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Spreadsheet {0} has no data in its first worksheet")]
    EmptyWorkbook(PathBuf),
    #[error("Missing column '{column}' in {path}")]
    MissingColumn { column: String, path: PathBuf },
}

/// Loads the dashboard's input tables.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file using Polars.
    pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        // Infer over every row so a late float never lands in an integer column
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(None)
            .finish()?
            .collect()?;

        Ok(df)
    }

    /// Parse CSV bytes already held in memory (remote downloads).
    pub fn parse_csv_bytes(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .into_reader_with_file_handle(std::io::Cursor::new(bytes))
            .finish()?;
        Ok(df)
    }

    /// Trim column names, lower-casing them as well when `lowercase` is set.
    pub fn normalize_columns(df: &DataFrame, lowercase: bool) -> Result<DataFrame, LoaderError> {
        let columns: Vec<Column> = df
            .get_columns()
            .iter()
            .map(|col| {
                let trimmed = col.name().trim();
                let name = if lowercase {
                    trimmed.to_lowercase()
                } else {
                    trimmed.to_string()
                };
                col.clone().with_name(name.into())
            })
            .collect();

        Ok(DataFrame::new(columns)?)
    }

    /// Load the time-series file: normalize names, parse periods, drop
    /// unparseable rows and sort chronologically.
    pub fn load_time_series(file_path: &Path) -> Result<TimeSeries, LoaderError> {
        let raw = Self::load_csv(file_path)?;
        let df = Self::normalize_columns(&raw, true)?;

        let missing = |column: &str| LoaderError::MissingColumn {
            column: column.to_string(),
            path: file_path.to_path_buf(),
        };
        let period_series = df.column(PERIOD_COL).map_err(|_| missing(PERIOD_COL))?;
        let category_series = df.column(CATEGORY_COL).map_err(|_| missing(CATEGORY_COL))?;
        let value_series = df.column(VALUE_COL).map_err(|_| missing(VALUE_COL))?;
        let value_f64 = value_series.cast(&DataType::Float64)?;
        let value_ca = value_f64.f64()?;

        let mut rows = Vec::with_capacity(df.height());
        let mut dropped = 0usize;

        for i in 0..df.height() {
            let period = period_series
                .get(i)
                .ok()
                .and_then(any_to_string)
                .and_then(|s| parse_period(&s));
            let category = category_series.get(i).ok().and_then(any_to_string);

            match (period, category) {
                (Some(period), Some(risk_category)) => rows.push(TimeSeriesRow {
                    period,
                    value: value_ca.get(i).filter(|v| !v.is_nan()),
                    risk_category,
                }),
                _ => dropped += 1,
            }
        }

        if dropped > 0 {
            tracing::debug!(
                "Dropped {} time-series rows with unparseable period or missing category",
                dropped
            );
        }

        // Stable sort keeps file order for equal dates
        rows.sort_by_key(|row| row.period);
        tracing::info!("Loaded {} time-series rows from {}", rows.len(), file_path.display());

        Ok(TimeSeries::new(rows))
    }

    /// Load the geospatial file. The first column holds the instrument label;
    /// every other numeric column is a period.
    pub fn load_geo(file_path: &Path) -> Result<GeoTable, LoaderError> {
        let raw = Self::load_csv(file_path)?;
        let df = Self::normalize_columns(&raw, false)?;
        let table = Self::geo_from_dataframe(&df)?;
        tracing::info!(
            "Loaded {} geo rows x {} periods from {}",
            table.rows.len(),
            table.periods.len(),
            file_path.display()
        );
        Ok(table)
    }

    /// Convert a wide instrument-by-period frame into a [`GeoTable`].
    ///
    /// A column is a period when its header parses as a period or its cells
    /// are numeric. Cells that are not numbers become missing values.
    pub fn geo_from_dataframe(df: &DataFrame) -> Result<GeoTable, LoaderError> {
        let columns = df.get_columns();
        let Some((label_col, period_cols)) = columns.split_first() else {
            return Ok(GeoTable::default());
        };

        let period_cols: Vec<&Column> = period_cols
            .iter()
            .filter(|col| is_numeric(col.dtype()) || parse_period(col.name()).is_some())
            .collect();
        let periods: Vec<String> = period_cols.iter().map(|c| c.name().to_string()).collect();

        let mut casted = Vec::with_capacity(period_cols.len());
        for col in &period_cols {
            casted.push(col.cast(&DataType::Float64)?);
        }

        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let Some(label) = label_col.get(i).ok().and_then(any_to_string) else {
                continue;
            };
            let mut volumes = Vec::with_capacity(casted.len());
            for col in &casted {
                volumes.push(col.f64()?.get(i).filter(|v| !v.is_nan()));
            }
            rows.push(GeoRow { label, volumes });
        }

        Ok(GeoTable { periods, rows })
    }

    /// Load the currency -> URL lookup from a spreadsheet or a CSV file.
    pub fn load_currency_urls(file_path: &Path) -> Result<Vec<CurrencyUrlEntry>, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::NotFound(file_path.to_path_buf()));
        }

        let extension = file_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let records = if extension == "csv" {
            let df = Self::normalize_columns(&Self::load_csv(file_path)?, true)?;
            Self::records_from_dataframe(&df)
        } else {
            Self::records_from_workbook(file_path)?
        };

        let mut header_iter = records.into_iter();
        let header = header_iter.next().unwrap_or_default();
        let position = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| LoaderError::MissingColumn {
                    column: name.to_string(),
                    path: file_path.to_path_buf(),
                })
        };
        let currency_idx = position("currency")?;
        let url_idx = position("url")?;

        let entries: Vec<CurrencyUrlEntry> = header_iter
            .filter_map(|record| {
                let currency = record.get(currency_idx)?.trim().to_string();
                let url = record.get(url_idx)?.trim().to_string();
                (!currency.is_empty() && !url.is_empty()).then_some(CurrencyUrlEntry { currency, url })
            })
            .collect();

        tracing::info!("Loaded {} currency URL entries from {}", entries.len(), file_path.display());
        Ok(entries)
    }

    /// Header row followed by data rows, all as strings.
    fn records_from_dataframe(df: &DataFrame) -> Vec<Vec<String>> {
        let header: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        let mut records = vec![header];
        for i in 0..df.height() {
            records.push(
                df.get_columns()
                    .iter()
                    .map(|col| col.get(i).ok().and_then(any_to_string).unwrap_or_default())
                    .collect(),
            );
        }
        records
    }

    fn records_from_workbook(file_path: &Path) -> Result<Vec<Vec<String>>, LoaderError> {
        use calamine::{open_workbook_auto, Reader};

        let mut workbook = open_workbook_auto(file_path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| LoaderError::EmptyWorkbook(file_path.to_path_buf()))??;
        if range.is_empty() {
            return Err(LoaderError::EmptyWorkbook(file_path.to_path_buf()));
        }

        Ok(range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect())
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Cell value as plain text, `None` for nulls.
pub fn any_to_string(value: AnyValue) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        other => Some(other.to_string().trim_matches('"').to_string()),
    }
}

/// Parse a period cell into a calendar date.
///
/// Partial dates resolve to their first day: `2024-05` is 1 May 2024 and
/// `2024-Q2` is 1 April 2024.
pub fn parse_period(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    if let Some(date) = parse_quarter(s) {
        return Some(date);
    }

    // Year-month and bare year
    if let Some((year, month)) = s.split_once('-') {
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }
    if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) {
        return NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1);
    }

    None
}

fn parse_quarter(s: &str) -> Option<NaiveDate> {
    let upper = s.to_ascii_uppercase();
    let (year, quarter) = upper.split_once('Q')?;
    let year: i32 = year.trim_end_matches('-').parse().ok()?;
    let quarter: u32 = quarter.parse().ok()?;
    if !(1..=4).contains(&quarter) {
        return None;
    }
    NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn parse_period_accepts_iso_dates() {
        let date = parse_period("2023-06-30").unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2023-06-30");
    }

    #[test]
    fn parse_period_resolves_partial_dates_to_first_day() {
        assert_eq!(parse_period("2024-05"), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(parse_period("1998"), NaiveDate::from_ymd_opt(1998, 1, 1));
        assert_eq!(parse_period("2024-Q2"), NaiveDate::from_ymd_opt(2024, 4, 1));
        assert_eq!(parse_period("2023Q4"), NaiveDate::from_ymd_opt(2023, 10, 1));
    }

    #[test]
    fn parse_period_rejects_garbage() {
        assert_eq!(parse_period(""), None);
        assert_eq!(parse_period("not a date"), None);
        assert_eq!(parse_period("2024-13"), None);
        assert_eq!(parse_period("2024-Q5"), None);
        assert_eq!(parse_period("2023-02-30"), None);
    }

    #[test]
    fn normalize_columns_trims_and_lowercases() {
        let df = DataFrame::new(vec![
            Column::new(" Period ".into(), vec!["2020-01-01"]),
            Column::new("Risk Category".into(), vec!["Credit"]),
        ])
        .unwrap();

        let lowered = DataLoader::normalize_columns(&df, true).unwrap();
        let names: Vec<String> = lowered.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["period", "risk category"]);

        let trimmed = DataLoader::normalize_columns(&df, false).unwrap();
        let names: Vec<String> = trimmed.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["Period", "Risk Category"]);
    }

    #[test]
    fn load_time_series_drops_bad_dates_and_sorts() {
        let file = write_temp(
            "Period,Value,Risk Category\n\
             2022-03-31,5.5,Credit\n\
             garbage,1.0,Credit\n\
             2021-12-31,2.5,Interest rate\n\
             2022-01-31,,Credit\n",
            ".csv",
        );

        let ts = DataLoader::load_time_series(file.path()).unwrap();
        let periods: Vec<String> = ts
            .rows()
            .iter()
            .map(|r| r.period.format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(periods, vec!["2021-12-31", "2022-01-31", "2022-03-31"]);
        assert_eq!(ts.rows()[1].value, None);
        assert_eq!(ts.rows()[2].value, Some(5.5));
    }

    #[test]
    fn load_time_series_requires_category_column() {
        let file = write_temp("period,value\n2022-03-31,5.5\n", ".csv");
        let err = DataLoader::load_time_series(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn { ref column, .. } if column == CATEGORY_COL));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = DataLoader::load_time_series(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }

    #[test]
    fn load_geo_uses_first_column_as_label() {
        let file = write_temp(
            ",2023-Q4,2024-Q2,Notes\n\
             US Dollar,100.0,110.0,x\n\
             Interest rate,7,8,y\n",
            ".csv",
        );

        let table = DataLoader::load_geo(file.path()).unwrap();
        assert_eq!(table.periods, vec!["2023-Q4", "2024-Q2"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].label, "US Dollar");
        assert_eq!(table.rows[1].volumes, vec![Some(7.0), Some(8.0)]);
    }

    #[test]
    fn load_currency_urls_from_csv() {
        let file = write_temp(
            "Currency,URL\n\
             Japanese Yen,https://example.org/jpy.csv\n\
             ,https://example.org/empty.csv\n",
            ".csv",
        );

        let entries = DataLoader::load_currency_urls(file.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].currency, "Japanese Yen");
        assert_eq!(entries[0].url, "https://example.org/jpy.csv");
    }

    fn write_xlsx(rows: &[&[&str]]) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if !cell.is_empty() {
                    sheet.write_string(r as u32, c as u16, *cell).unwrap();
                }
            }
        }
        workbook.save(file.path()).unwrap();
        file
    }

    #[test]
    fn late_float_value_is_kept() {
        let mut contents = String::from("period,value,risk category\n");
        for _ in 0..10_005 {
            contents.push_str("2020-01-01,1,A\n");
        }
        contents.push_str("2021-01-01,2.5,A\n");
        let file = write_temp(&contents, ".csv");

        let ts = DataLoader::load_time_series(file.path()).unwrap();
        assert_eq!(ts.rows().len(), 10_006);
        assert_eq!(ts.rows().last().map(|r| r.value), Some(Some(2.5)));
        assert!(ts.rows().iter().all(|r| r.value.is_some()));
    }

    #[test]
    fn load_geo_keeps_period_with_bad_cell() {
        let file = write_temp(",2023-Q4,2024-Q2\nUS Dollar,100,n/a\n", ".csv");

        let table = DataLoader::load_geo(file.path()).unwrap();
        assert_eq!(table.periods, vec!["2023-Q4", "2024-Q2"]);
        assert_eq!(table.rows[0].volumes, vec![Some(100.0), None]);
    }

    #[test]
    fn load_currency_urls_from_xlsx() {
        let file = write_xlsx(&[
            &[" Currency ", "URL"],
            &["Japanese Yen", " https://example.org/jpy.csv "],
            &["", ""],
            &["US Dollar", ""],
            &["Euro", "https://example.org/eur.csv"],
        ]);

        let entries = DataLoader::load_currency_urls(file.path()).unwrap();
        assert_eq!(
            entries,
            vec![
                CurrencyUrlEntry {
                    currency: "Japanese Yen".to_string(),
                    url: "https://example.org/jpy.csv".to_string(),
                },
                CurrencyUrlEntry {
                    currency: "Euro".to_string(),
                    url: "https://example.org/eur.csv".to_string(),
                },
            ]
        );
    }

    #[test]
    fn xlsx_without_url_column_is_an_error() {
        let file = write_xlsx(&[&["currency", "link"], &["Euro", "https://example.org/eur.csv"]]);
        let err = DataLoader::load_currency_urls(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn { ref column, .. } if column == "url"));
    }

    #[test]
    fn empty_xlsx_is_an_error() {
        let file = write_xlsx(&[]);
        let err = DataLoader::load_currency_urls(file.path()).unwrap_err();
        assert!(matches!(err, LoaderError::EmptyWorkbook(_)));
    }

    #[test]
    fn parse_csv_bytes_reads_in_memory_data() {
        let df = DataLoader::parse_csv_bytes(b"a,b\n1,2\n3,4\n".to_vec()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
    }
}
