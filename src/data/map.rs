//! Map View Module
//! Joins aggregated country volumes with the static coordinate table.

use super::geo::CountryTotals;
use super::lookup::coordinate_for;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    #[error("Period {0} is not present in the geospatial data")]
    UnknownPeriod(String),
}

/// One bubble on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub country: String,
    pub longitude: f64,
    pub latitude: f64,
    pub volume: f64,
}

/// Everything the map page shows for one period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapFrame {
    pub period: String,
    pub points: Vec<MapPoint>,
    /// Sum over all aggregated countries, including ones without coordinates.
    pub total_volume: f64,
}

impl MapFrame {
    /// Build the map for `period`. Countries without coordinates are dropped.
    pub fn build(totals: &CountryTotals, period: &str) -> Result<Self, MapError> {
        let column = totals
            .column(period)
            .ok_or_else(|| MapError::UnknownPeriod(period.to_string()))?;

        let total_volume: f64 = column.iter().map(|(_, v)| v).sum();

        let points = column
            .into_iter()
            .filter_map(|(country, volume)| {
                let Some(coord) = coordinate_for(country) else {
                    tracing::debug!("No coordinates for '{}', left off the map", country);
                    return None;
                };
                Some(MapPoint {
                    country: country.to_string(),
                    longitude: coord.longitude,
                    latitude: coord.latitude,
                    volume,
                })
            })
            .collect();

        Ok(Self {
            period: period.to_string(),
            points,
            total_volume,
        })
    }

    /// Empty map for a period with no data.
    pub fn empty(period: &str) -> Self {
        Self {
            period: period.to_string(),
            ..Default::default()
        }
    }

    /// Countries on the map, in map order.
    pub fn countries(&self) -> Vec<String> {
        self.points.iter().map(|p| p.country.clone()).collect()
    }

    /// Smallest and largest volume on the map.
    pub fn volume_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.points.iter().map(|p| p.volume);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// `1234567.891` -> `1,234,567.89`
pub fn format_volume(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::geo::CountryTotal;

    fn totals() -> CountryTotals {
        CountryTotals {
            periods: vec!["2023-Q4".to_string(), "2024-Q2".to_string()],
            rows: vec![
                CountryTotal {
                    country: "Atlantis".to_string(),
                    volumes: vec![7.0, 1.0],
                },
                CountryTotal {
                    country: "Japan".to_string(),
                    volumes: vec![15.0, 20.0],
                },
                CountryTotal {
                    country: "Brazil".to_string(),
                    volumes: vec![3.0, 4.0],
                },
            ],
        }
    }

    #[test]
    fn countries_without_coordinates_are_dropped() {
        let frame = MapFrame::build(&totals(), "2023-Q4").unwrap();
        assert_eq!(frame.countries(), vec!["Japan", "Brazil"]);
        assert!(frame.points.iter().all(|p| p.country != "Atlantis"));
    }

    #[test]
    fn total_includes_countries_dropped_from_map() {
        let frame = MapFrame::build(&totals(), "2023-Q4").unwrap();
        assert_eq!(frame.total_volume, 25.0);
        let plotted: f64 = frame.points.iter().map(|p| p.volume).sum();
        assert_eq!(plotted, 18.0);
    }

    #[test]
    fn points_carry_period_volume_and_coordinates() {
        let frame = MapFrame::build(&totals(), "2024-Q2").unwrap();
        let japan = frame.points.iter().find(|p| p.country == "Japan").unwrap();
        assert_eq!(japan.volume, 20.0);
        assert_eq!(japan.longitude, 138.25);
        assert_eq!(japan.latitude, 36.20);
        assert_eq!(frame.volume_range(), Some((4.0, 20.0)));
    }

    #[test]
    fn unknown_period_is_an_error() {
        let err = MapFrame::build(&totals(), "2024-Q3").unwrap_err();
        assert_eq!(err, MapError::UnknownPeriod("2024-Q3".to_string()));
    }

    #[test]
    fn format_volume_groups_thousands() {
        assert_eq!(format_volume(0.0), "0.00");
        assert_eq!(format_volume(999.999), "1,000.00");
        assert_eq!(format_volume(1234567.891), "1,234,567.89");
        assert_eq!(format_volume(-4321.5), "-4,321.50");
    }
}
