//! City and ZIP row types shared by the loader, scraper and exporters

use serde::{Deserialize, Serialize};

/// Separator between city and full state name in the join key
pub const CITY_STATE_SEPARATOR: char = '*';

/// Build the `city*state_full` join key
pub fn city_state_key(city: &str, state_full: &str) -> String {
    format!("{}{}{}", city, CITY_STATE_SEPARATOR, state_full)
}

/// One row of the reference table, after header normalization
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CityRecord {
    pub city: String,
    pub state_short: String,
    pub state_full: String,
    #[serde(default)]
    pub county: String,
    #[serde(default)]
    pub city_alias: String,
    /// Filled in after deserialization
    #[serde(skip)]
    pub city_state: String,
}

/// Reduced row that gets scraped, one per unique `city_state`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingCity {
    pub city: String,
    pub state_short: String,
    pub state_full: String,
    pub city_state: String,
    pub url: String,
}

/// Scrape outcome for one working row. `zips` is space-separated, empty if none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipResult {
    pub city: String,
    pub state_short: String,
    pub state_full: String,
    pub city_state: String,
    pub zips: String,
}

impl ZipResult {
    pub fn new(city: &WorkingCity, zips: String) -> Self {
        Self {
            city: city.city.clone(),
            state_short: city.state_short.clone(),
            state_full: city.state_full.clone(),
            city_state: city.city_state.clone(),
            zips,
        }
    }

    /// Blank and whitespace-only results count as missing
    pub fn is_missing(&self) -> bool {
        self.zips.trim().is_empty()
    }
}

/// Row of `city2zip.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct City2Zip {
    pub city: String,
    pub state_short: String,
    pub state_full: String,
    pub zips: String,
}

impl City2Zip {
    pub const HEADER: &'static [&'static str] = &["city", "state_short", "state_full", "zips"];
}

/// Row of `us_cities_states_counties_zips.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedExport {
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State short")]
    pub state_short: String,
    #[serde(rename = "State full")]
    pub state_full: String,
    #[serde(rename = "County")]
    pub county: String,
    #[serde(rename = "City alias")]
    pub city_alias: String,
    #[serde(rename = "City zip codes")]
    pub zips: String,
}

impl MergedExport {
    pub const HEADER: &'static [&'static str] = &[
        "City",
        "State short",
        "State full",
        "County",
        "City alias",
        "City zip codes",
    ];
}
