//! Geo Aggregation Module
//! Splits instrument rows into foreign-exchange and interest-rate subsets and
//! combines them into per-country transaction volumes.

use super::lookup::{country_for_currency, INTEREST_RATE_LABEL};
use std::collections::BTreeMap;

/// Instrument class of a geo row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentClass {
    InterestRate,
    ForeignExchange,
}

impl InstrumentClass {
    pub fn classify(label: &str) -> Self {
        if label == INTEREST_RATE_LABEL {
            InstrumentClass::InterestRate
        } else {
            InstrumentClass::ForeignExchange
        }
    }
}

/// One instrument row; `volumes` is aligned with [`GeoTable::periods`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRow {
    pub label: String,
    pub volumes: Vec<Option<f64>>,
}

impl GeoRow {
    pub fn class(&self) -> InstrumentClass {
        InstrumentClass::classify(&self.label)
    }
}

/// Instrument-by-period volume table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoTable {
    pub periods: Vec<String>,
    pub rows: Vec<GeoRow>,
}

/// Combined volume of one country, aligned with [`CountryTotals::periods`].
#[derive(Debug, Clone, PartialEq)]
pub struct CountryTotal {
    pub country: String,
    pub volumes: Vec<f64>,
}

/// Aggregated per-country volumes, ordered by country name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountryTotals {
    pub periods: Vec<String>,
    pub rows: Vec<CountryTotal>,
}

impl CountryTotals {
    pub fn period_index(&self, period: &str) -> Option<usize> {
        self.periods.iter().position(|p| p == period)
    }

    /// `(country, volume)` pairs for one period, `None` if the period is unknown.
    pub fn column(&self, period: &str) -> Option<Vec<(&str, f64)>> {
        let idx = self.period_index(period)?;
        Some(
            self.rows
                .iter()
                .map(|row| (row.country.as_str(), row.volumes[idx]))
                .collect(),
        )
    }

    pub fn volume(&self, country: &str, period: &str) -> Option<f64> {
        let idx = self.period_index(period)?;
        self.rows
            .iter()
            .find(|row| row.country == country)
            .map(|row| row.volumes[idx])
    }

    /// Sum over every aggregated country for `period`.
    pub fn period_total(&self, period: &str) -> Option<f64> {
        self.column(period)
            .map(|col| col.iter().map(|(_, v)| v).sum())
    }
}

/// Builds [`CountryTotals`] from a [`GeoTable`].
pub struct GeoAggregator;

impl GeoAggregator {
    /// Sum of all interest-rate rows, one value per period.
    pub fn interest_rate_totals(table: &GeoTable) -> Vec<f64> {
        let mut totals = vec![0.0; table.periods.len()];
        for row in table
            .rows
            .iter()
            .filter(|r| r.class() == InstrumentClass::InterestRate)
        {
            add_volumes(&mut totals, &row.volumes);
        }
        totals
    }

    /// Foreign-exchange rows summed per mapped country. Rows whose currency
    /// has no country are left out.
    pub fn foreign_exchange_by_country(table: &GeoTable) -> BTreeMap<&'static str, Vec<f64>> {
        let mut grouped: BTreeMap<&'static str, Vec<f64>> = BTreeMap::new();

        for row in table
            .rows
            .iter()
            .filter(|r| r.class() == InstrumentClass::ForeignExchange)
        {
            let Some(country) = country_for_currency(&row.label) else {
                tracing::debug!("No country mapped for currency '{}', row skipped", row.label);
                continue;
            };
            let totals = grouped
                .entry(country)
                .or_insert_with(|| vec![0.0; table.periods.len()]);
            add_volumes(totals, &row.volumes);
        }

        grouped
    }

    /// Per-country FX totals with the global interest-rate total added to
    /// every country for each period.
    pub fn aggregate(table: &GeoTable) -> CountryTotals {
        let interest = Self::interest_rate_totals(table);

        let rows = Self::foreign_exchange_by_country(table)
            .into_iter()
            .map(|(country, mut volumes)| {
                for (volume, ir) in volumes.iter_mut().zip(&interest) {
                    *volume += ir;
                }
                CountryTotal {
                    country: country.to_string(),
                    volumes,
                }
            })
            .collect();

        CountryTotals {
            periods: table.periods.clone(),
            rows,
        }
    }
}

/// Missing cells count as zero.
fn add_volumes(totals: &mut [f64], volumes: &[Option<f64>]) {
    for (total, volume) in totals.iter_mut().zip(volumes) {
        *total += volume.unwrap_or(0.0);
    }
}
