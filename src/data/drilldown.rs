//! Country Drill-Down Module
//! Resolves a country back to its currency's history URL and fetches the
//! remote CSV.

use super::export::country_file_name;
use super::loader::DataLoader;
use super::lookup::currencies_for_country;
use polars::prelude::*;
use reqwest::blocking::Client;
use std::time::Duration;
use thiserror::Error;

/// Rows shown in the history preview.
pub const PREVIEW_ROWS: usize = 10;

/// One row of the currency -> URL lookup file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyUrlEntry {
    pub currency: String,
    pub url: String,
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse remote data: {0}")]
    Parse(String),
}

/// Source of remote history files.
pub trait HistorySource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP source.
pub struct HttpHistorySource {
    client: Client,
}

impl HttpHistorySource {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }
}

impl HistorySource for HttpHistorySource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        tracing::info!("Downloading {}", url);
        let resp = self.client.get(url).send()?.error_for_status()?;
        Ok(resp.bytes()?.to_vec())
    }
}

/// A fetched country history, ready for download and preview.
#[derive(Debug, Clone)]
pub struct CountryHistory {
    pub country: String,
    pub url: String,
    pub frame: DataFrame,
    /// Bytes exactly as fetched
    pub csv: Vec<u8>,
}

impl CountryHistory {
    pub fn file_name(&self) -> String {
        country_file_name(&self.country)
    }

    pub fn preview(&self) -> DataFrame {
        self.frame.head(Some(PREVIEW_ROWS))
    }
}

/// Result of a drill-down request. Failures never propagate; they become
/// a warning message for the page.
#[derive(Debug, Clone)]
pub enum DrillDown {
    Ready(CountryHistory),
    Warning(String),
}

impl DrillDown {
    pub fn warning(&self) -> Option<&str> {
        match self {
            DrillDown::Warning(msg) => Some(msg.as_str()),
            DrillDown::Ready(_) => None,
        }
    }
}

pub fn no_data_warning(country: &str) -> String {
    format!("No data available for {}.", country)
}

pub fn fetch_failed_warning(country: &str) -> String {
    format!("Failed to fetch data for {}.", country)
}

/// URL of the first lookup entry whose currency belongs to `country`.
pub fn resolve_url<'a>(country: &str, entries: &'a [CurrencyUrlEntry]) -> Option<&'a str> {
    let candidates = currencies_for_country(country);
    if candidates.is_empty() {
        tracing::debug!("No currency maps to '{}'", country);
        return None;
    }

    entries
        .iter()
        .find(|entry| candidates.contains(&entry.currency.as_str()))
        .map(|entry| entry.url.as_str())
}

/// Resolve, fetch and parse the history of `country`.
pub fn drill_down<S: HistorySource + ?Sized>(
    country: &str,
    entries: &[CurrencyUrlEntry],
    source: &S,
) -> DrillDown {
    let Some(url) = resolve_url(country, entries) else {
        return DrillDown::Warning(no_data_warning(country));
    };

    match fetch_history(country, url, source) {
        Ok(history) => {
            tracing::info!(
                "Fetched {} rows of history for {}",
                history.frame.height(),
                country
            );
            DrillDown::Ready(history)
        }
        Err(e) => {
            tracing::warn!("Drill-down for {} failed: {}", country, e);
            DrillDown::Warning(fetch_failed_warning(country))
        }
    }
}

fn fetch_history<S: HistorySource + ?Sized>(
    country: &str,
    url: &str,
    source: &S,
) -> Result<CountryHistory, FetchError> {
    let csv = source.fetch(url)?;
    // The download is the fetched file itself; the frame only feeds the preview
    let frame =
        DataLoader::parse_csv_bytes(csv.clone()).map_err(|e| FetchError::Parse(e.to_string()))?;
    if frame.width() == 0 {
        return Err(FetchError::Parse("no columns".to_string()));
    }

    Ok(CountryHistory {
        country: country.to_string(),
        url: url.to_string(),
        frame,
        csv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct StubSource {
        body: Result<Vec<u8>, String>,
        calls: RefCell<Vec<String>>,
    }

    impl StubSource {
        fn ok(body: &str) -> Self {
            Self {
                body: Ok(body.as_bytes().to_vec()),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                body: Err("connection refused".to_string()),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl HistorySource for StubSource {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.borrow_mut().push(url.to_string());
            self.body.clone().map_err(FetchError::Parse)
        }
    }

    fn entries() -> Vec<CurrencyUrlEntry> {
        vec![
            CurrencyUrlEntry {
                currency: "US Dollar".to_string(),
                url: "https://example.org/usd.csv".to_string(),
            },
            CurrencyUrlEntry {
                currency: "Japanese Yen".to_string(),
                url: "https://example.org/jpy.csv".to_string(),
            },
            CurrencyUrlEntry {
                currency: "Japanese Yen".to_string(),
                url: "https://example.org/jpy-mirror.csv".to_string(),
            },
        ]
    }

    #[test]
    fn resolve_url_takes_first_matching_entry() {
        assert_eq!(resolve_url("Japan", &entries()), Some("https://example.org/jpy.csv"));
        assert_eq!(resolve_url("Brazil", &entries()), None);
        assert_eq!(resolve_url("Atlantis", &entries()), None);
    }

    #[test]
    fn unknown_country_warns_without_fetching() {
        let source = StubSource::ok("a\n1\n");
        let result = drill_down("Atlantis", &entries(), &source);

        assert_eq!(result.warning(), Some("No data available for Atlantis."));
        assert!(source.calls.borrow().is_empty());
    }

    #[test]
    fn missing_url_entry_warns_without_fetching() {
        let source = StubSource::ok("a\n1\n");
        let result = drill_down("Brazil", &entries(), &source);

        assert_eq!(result.warning(), Some("No data available for Brazil."));
        assert!(source.calls.borrow().is_empty());
    }

    #[test]
    fn fetch_failure_becomes_named_warning() {
        let source = StubSource::failing();
        let result = drill_down("Japan", &entries(), &source);

        assert_eq!(result.warning(), Some("Failed to fetch data for Japan."));
        assert_eq!(source.calls.borrow().len(), 1);
    }

    #[test]
    fn successful_fetch_offers_download_and_preview() {
        let mut body = String::from("date,value\n");
        for day in 1..=15 {
            body.push_str(&format!("2024-01-{:02},{}\n", day, day));
        }
        let source = StubSource::ok(&body);

        let DrillDown::Ready(history) = drill_down("Japan", &entries(), &source) else {
            panic!("expected history");
        };
        assert_eq!(history.url, "https://example.org/jpy.csv");
        assert_eq!(history.file_name(), "Japan_transactions.csv");
        assert_eq!(history.frame.height(), 15);
        assert_eq!(history.preview().height(), PREVIEW_ROWS);
        assert!(String::from_utf8(history.csv).unwrap().starts_with("date,value\n"));
    }

    #[test]
    fn download_keeps_late_values_intact() {
        let mut body = String::from("date,value\n");
        for i in 0..10_005 {
            body.push_str(&format!("d{},{}\n", i, i));
        }
        body.push_str("dlast,1.5\n");
        let source = StubSource::ok(&body);

        let DrillDown::Ready(history) = drill_down("Japan", &entries(), &source) else {
            panic!("expected history");
        };
        assert_eq!(history.csv, body.as_bytes());
        assert_eq!(history.frame.height(), 10_006);

        let values = history.frame.column("value").unwrap().f64().unwrap();
        assert_eq!(values.null_count(), 0);
        assert_eq!(values.get(10_005), Some(1.5));
    }

    #[test]
    fn empty_body_becomes_fetch_warning() {
        let source = StubSource::ok("");
        let result = drill_down("Japan", &entries(), &source);
        assert_eq!(result.warning(), Some("Failed to fetch data for Japan."));
    }
}
