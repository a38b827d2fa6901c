//! Runtime configuration read from the environment (and an optional `.env`).

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub timeseries_path: PathBuf,
    pub geo_path: PathBuf,
    pub url_list_path: PathBuf,
    pub fetch_timeout: Duration,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any variable lookup; unset or invalid values fall back to defaults.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |key: &str, default: &str| {
            var(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        let timeout_secs = var("DASHBOARD_FETCH_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

        let log_format = match var("DASHBOARD_LOG_FORMAT") {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Self {
            timeseries_path: path("DASHBOARD_TIMESERIES_PATH", "DerivativeData_TimeSeries.csv"),
            geo_path: path("DASHBOARD_GEO_PATH", "DerivativeData_Geo.csv"),
            url_list_path: path("DASHBOARD_URL_LIST_PATH", "CountryDataURL_list.xlsx"),
            fetch_timeout: Duration::from_secs(timeout_secs),
            log_format,
        }
    }
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(format: LogFormat) {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}
