//! The dashboard's immutable input tables, loaded once at startup.

use super::drilldown::CurrencyUrlEntry;
use super::geo::{CountryTotals, GeoAggregator, GeoTable};
use super::loader::{DataLoader, LoaderError};
use super::map::{MapError, MapFrame};
use super::timeseries::TimeSeries;
use crate::config::Config;

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub time_series: TimeSeries,
    pub geo: GeoTable,
    pub totals: CountryTotals,
    pub currency_urls: Vec<CurrencyUrlEntry>,
}

impl Dataset {
    /// Load every input file named by `config`. Any failure is fatal to the caller.
    pub fn load(config: &Config) -> Result<Self, LoaderError> {
        let time_series = DataLoader::load_time_series(&config.timeseries_path)?;
        let geo = DataLoader::load_geo(&config.geo_path)?;
        let currency_urls = DataLoader::load_currency_urls(&config.url_list_path)?;
        Ok(Self::from_parts(time_series, geo, currency_urls))
    }

    pub fn from_parts(
        time_series: TimeSeries,
        geo: GeoTable,
        currency_urls: Vec<CurrencyUrlEntry>,
    ) -> Self {
        let totals = GeoAggregator::aggregate(&geo);
        tracing::info!(
            "Aggregated {} countries over {} periods",
            totals.rows.len(),
            totals.periods.len()
        );
        Self {
            time_series,
            geo,
            totals,
            currency_urls,
        }
    }

    pub fn map_frame(&self, period: &str) -> Result<MapFrame, MapError> {
        MapFrame::build(&self.totals, period)
    }
}
