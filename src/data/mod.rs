//! Data module - loading, aggregation and view models

pub mod dataset;
pub mod drilldown;
pub mod export;
pub mod geo;
pub mod loader;
pub mod lookup;
pub mod map;
pub mod timeseries;

pub use dataset::Dataset;
pub use drilldown::{drill_down, CountryHistory, CurrencyUrlEntry, DrillDown, HistorySource, HttpHistorySource};
pub use geo::{CountryTotals, GeoAggregator, GeoTable};
pub use loader::{DataLoader, LoaderError};
pub use map::{MapFrame, MapPoint};
pub use timeseries::{TimeSeries, TimeSeriesRow};
