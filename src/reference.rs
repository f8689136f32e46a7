//! Reference table of US cities, states and counties
//!
//! Source: https://github.com/grammakov/USA-cities-and-states/

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::slug::url_for;
use crate::types::{city_state_key, CityRecord, WorkingCity};

/// Full reference table plus the deduplicated rows to scrape
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub records: Vec<CityRecord>,
    pub cities: Vec<WorkingCity>,
}

/// Normalize a header like "State short" to "state_short"
fn snake_case(name: &str) -> String {
    name.trim().replace(' ', "_").to_lowercase()
}

/// Parse the pipe-delimited reference CSV
pub fn parse_records(content: &str) -> Result<Vec<CityRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .from_reader(content.as_bytes());

    let headers: csv::StringRecord = reader
        .headers()
        .context("Failed to read reference CSV header")?
        .iter()
        .map(snake_case)
        .collect();
    reader.set_headers(headers);

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<CityRecord>().enumerate() {
        let mut record = row.with_context(|| format!("Failed to parse reference row {}", i + 1))?;
        record.city_state = city_state_key(&record.city, &record.state_full);
        records.push(record);
    }
    Ok(records)
}

/// Reduce the reference rows to one working row per `city_state`, first seen wins
pub fn working_cities(records: &[CityRecord], base_url: &str) -> Vec<WorkingCity> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(r.city_state.as_str()))
        .map(|r| WorkingCity {
            city: r.city.clone(),
            state_short: r.state_short.clone(),
            state_full: r.state_full.clone(),
            city_state: r.city_state.clone(),
            url: url_for(base_url, &r.city, &r.state_full),
        })
        .collect()
}

impl ReferenceData {
    pub fn from_csv(content: &str, base_url: &str) -> Result<Self> {
        let records = parse_records(content)?;
        let cities = working_cities(&records, base_url);
        Ok(Self { records, cities })
    }

    /// Download and parse the reference table
    pub fn fetch(client: &reqwest::blocking::Client, url: &str, base_url: &str) -> Result<Self> {
        let content = client
            .get(url)
            .send()
            .with_context(|| format!("Failed to fetch reference table: {}", url))?
            .error_for_status()
            .with_context(|| format!("Reference table request failed: {}", url))?
            .text()
            .with_context(|| format!("Failed to read reference table: {}", url))?;
        Self::from_csv(&content, base_url)
    }

    /// Parse a reference table that was downloaded ahead of time
    pub fn from_file(path: &Path, base_url: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference file: {}", path.display()))?;
        Self::from_csv(&content, base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://codigo-postal.co/eeuu/";

    const SAMPLE: &str = "\
City|State short|State full|County|City alias
Holtsville|NY|New York|SUFFOLK|Internal Revenue Service
Holtsville|NY|New York|SUFFOLK|Holtsville
Adjuntas|PR|Puerto Rico|ADJUNTAS|URB San Joaquin
Washington|DC|Washington Dc|DISTRICT OF COLUMBIA|Washington
";

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("State short"), "state_short");
        assert_eq!(snake_case("City alias"), "city_alias");
        assert_eq!(snake_case("CITY"), "city");
    }

    #[test]
    fn test_parse_records() {
        let records = parse_records(SAMPLE).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].city, "Holtsville");
        assert_eq!(records[0].state_short, "NY");
        assert_eq!(records[0].county, "SUFFOLK");
        assert_eq!(records[0].city_alias, "Internal Revenue Service");
        assert_eq!(records[0].city_state, "Holtsville*New York");
    }

    #[test]
    fn test_missing_column_fails() {
        let content = "City|State short\nHoltsville|NY\n";
        assert!(parse_records(content).is_err());
    }

    #[test]
    fn test_working_cities_dedup() {
        let data = ReferenceData::from_csv(SAMPLE, BASE).unwrap();
        assert_eq!(data.records.len(), 4);
        assert_eq!(data.cities.len(), 3);

        let keys: Vec<&str> = data.cities.iter().map(|c| c.city_state.as_str()).collect();
        assert_eq!(
            keys,
            vec!["Holtsville*New York", "Adjuntas*Puerto Rico", "Washington*Washington Dc"]
        );
        assert_eq!(
            data.cities[2].url,
            "https://codigo-postal.co/eeuu/district-of-columbia/washington/"
        );
    }
}
