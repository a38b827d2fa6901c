//! Static Lookup Tables
//! Currency, country and coordinate tables shared by the geo views.

/// Instrument label that marks a geo row as interest-rate volume.
pub const INTEREST_RATE_LABEL: &str = "Interest rate";

/// Quarters selectable on the map page.
pub const PERIOD_OPTIONS: [&str; 3] = ["2023-Q4", "2024-Q2", "2024-Q3"];

/// Currency label -> country name.
pub const CURRENCY_TO_COUNTRY: [(&str, &str); 17] = [
    ("Australian Dollar", "Australia"),
    ("Brazilian Real", "Brazil"),
    ("Canadian Dollar", "Canada"),
    ("Swiss Franc", "Switzerland"),
    ("Renminbi", "China"),
    ("Euro", "Eurozone"),
    ("British Pound", "United Kingdom"),
    ("Indian Rupee", "India"),
    ("Japanese Yen", "Japan"),
    ("Mexican Peso", "Mexico"),
    ("Russian Ruble", "Russia"),
    ("US Dollar", "United States"),
    ("South African Rand", "South Africa"),
    ("New Zealand Dollar", "New Zealand"),
    ("Singapore Dollar", "Singapore"),
    ("Hong Kong Dollar", "Hong Kong"),
    ("South Korean Won", "South Korea"),
];

/// Country name -> (longitude, latitude).
pub const COUNTRY_COORDINATES: [(&str, (f64, f64)); 17] = [
    ("United States", (-98.35, 39.50)),
    ("Canada", (-106.35, 56.13)),
    ("United Kingdom", (-3.44, 55.38)),
    ("Australia", (133.77, -25.27)),
    ("Brazil", (-51.93, -14.24)),
    ("India", (78.96, 20.59)),
    ("China", (104.19, 35.86)),
    ("Japan", (138.25, 36.20)),
    ("South Africa", (22.94, -30.56)),
    ("Mexico", (-102.55, 23.63)),
    ("Russia", (105.32, 61.52)),
    ("New Zealand", (174.89, -40.90)),
    ("Switzerland", (8.23, 46.82)),
    ("Eurozone", (10.45, 51.17)),
    ("South Korea", (127.98, 37.57)),
    ("Singapore", (103.82, 1.35)),
    ("Hong Kong", (114.17, 22.32)),
];

/// Geographic position of a country marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub longitude: f64,
    pub latitude: f64,
}

/// Country a currency label belongs to, if it is one of the tracked currencies.
pub fn country_for_currency(currency: &str) -> Option<&'static str> {
    CURRENCY_TO_COUNTRY
        .iter()
        .find(|(label, _)| *label == currency)
        .map(|(_, country)| *country)
}

/// All currency labels that map to `country`, in table order.
pub fn currencies_for_country(country: &str) -> Vec<&'static str> {
    CURRENCY_TO_COUNTRY
        .iter()
        .filter(|(_, c)| *c == country)
        .map(|(label, _)| *label)
        .collect()
}

pub fn coordinate_for(country: &str) -> Option<Coordinate> {
    COUNTRY_COORDINATES
        .iter()
        .find(|(c, _)| *c == country)
        .map(|(_, (longitude, latitude))| Coordinate {
            longitude: *longitude,
            latitude: *latitude,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mapped_country_has_coordinates() {
        for (_, country) in CURRENCY_TO_COUNTRY {
            assert!(coordinate_for(country).is_some(), "{country} has no coordinates");
        }
    }

    #[test]
    fn currency_lookup_is_exact() {
        assert_eq!(country_for_currency("Japanese Yen"), Some("Japan"));
        assert_eq!(country_for_currency("japanese yen"), None);
        assert_eq!(country_for_currency(INTEREST_RATE_LABEL), None);
    }

    #[test]
    fn reverse_lookup_scans_forward_table() {
        assert_eq!(currencies_for_country("Eurozone"), vec!["Euro"]);
        assert!(currencies_for_country("Atlantis").is_empty());
    }

    #[test]
    fn coordinates_are_longitude_first() {
        let japan = coordinate_for("Japan").unwrap();
        assert_eq!(japan.longitude, 138.25);
        assert_eq!(japan.latitude, 36.20);
    }
}
