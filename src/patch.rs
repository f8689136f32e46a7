//! Manual ZIP overrides and the two CSV exports

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::types::{City2Zip, CityRecord, MergedExport, ZipResult};

pub const CITY2ZIP_FILE: &str = "city2zip.csv";
pub const MERGED_FILE: &str = "us_cities_states_counties_zips.csv";

/// Hand-searched ZIPs for places the lookup site does not list,
/// keyed by `city*state_full`
pub const ZIP_OVERRIDES: &[(&str, &str)] = &[
    ("Apo*US Armed Forces Europe", "09014"),
    ("DPO*US Armed Forces Europe", "09498"),
    ("FPO*US Armed Forces Europe", "09596"),
    ("Fpo*US Armed Forces Europe", "09596"),
    ("GPO*New York", "10001"),
    ("NASA*Florida", "32953"),
    ("Texhoma*Texas", "73960"),
    ("Apo*US Armed Forces Pacific", "96267"),
    ("DPO*US Armed Forces Pacific", "96521"),
    ("FPO*US Armed Forces Pacific", "96362"),
    ("Jb Phh*Hawaii", "96818 96853 96860"),
    ("Palau*Palau", "96940"),
    ("Pohnpei*Federated States of Micronesia", "96941"),
    ("Chuuk*Federated States of Micronesia", "96942"),
    ("Yap*Federated States of Micronesia", "96943"),
    ("Kosrae*Federated States of Micronesia", "96944"),
    ("Majuro*Marshall Islands", "96960"),
    ("Ebeye*Marshall Islands", "96970"),
];

pub fn override_for(city_state: &str) -> Option<&'static str> {
    ZIP_OVERRIDES
        .iter()
        .find(|(key, _)| *key == city_state)
        .map(|(_, zips)| *zips)
}

/// Counts reported at the end of a run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PatchStats {
    pub scraped: usize,
    pub patched: usize,
    pub missing: usize,
}

impl std::fmt::Display for PatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  Scraped:   {}", self.scraped)?;
        writeln!(f, "  Patched:   {}", self.patched)?;
        write!(f, "  Missing:   {}", self.missing)
    }
}

/// Fill missing results from [`ZIP_OVERRIDES`]. Results still missing afterwards
/// are normalized to an empty string.
pub fn apply_overrides(results: &mut [ZipResult]) -> PatchStats {
    let mut stats = PatchStats::default();
    for result in results.iter_mut() {
        if !result.is_missing() {
            stats.scraped += 1;
            continue;
        }
        match override_for(&result.city_state) {
            Some(zips) => {
                result.zips = zips.to_string();
                stats.patched += 1;
            }
            None => {
                result.zips.clear();
                stats.missing += 1;
            }
        }
    }
    stats
}

pub fn city2zip_rows(results: &[ZipResult]) -> Vec<City2Zip> {
    results
        .iter()
        .map(|r| City2Zip {
            city: r.city.clone(),
            state_short: r.state_short.clone(),
            state_full: r.state_full.clone(),
            zips: r.zips.clone(),
        })
        .collect()
}

/// Inner join of the results onto the reference table on `city_state`.
/// Rows come out in result order, then reference order within one key.
pub fn merged_rows(results: &[ZipResult], records: &[CityRecord]) -> Vec<MergedExport> {
    let mut by_key: HashMap<&str, Vec<&CityRecord>> = HashMap::new();
    for record in records {
        by_key.entry(record.city_state.as_str()).or_default().push(record);
    }

    let mut rows = Vec::new();
    for result in results {
        let Some(matches) = by_key.get(result.city_state.as_str()) else {
            continue;
        };
        for record in matches {
            rows.push(MergedExport {
                city: record.city.clone(),
                state_short: record.state_short.clone(),
                state_full: record.state_full.clone(),
                county: record.county.clone(),
                city_alias: record.city_alias.clone(),
                zips: result.zips.clone(),
            });
        }
    }
    rows
}

/// Header is written explicitly so an export with no rows still carries it
fn write_rows<W: Write, T: serde::Serialize>(
    writer: W,
    delimiter: u8,
    header: &[&str],
    rows: &[T],
) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(header)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_city2zip<W: Write>(writer: W, rows: &[City2Zip]) -> Result<()> {
    write_rows(writer, b',', City2Zip::HEADER, rows)
}

pub fn write_merged<W: Write>(writer: W, rows: &[MergedExport]) -> Result<()> {
    write_rows(writer, b'|', MergedExport::HEADER, rows)
}

/// Write both exports into `dir`
pub fn write_outputs(dir: &Path, city2zip: &[City2Zip], merged: &[MergedExport]) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let path = dir.join(CITY2ZIP_FILE);
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_city2zip(file, city2zip).with_context(|| format!("Failed to write {}", path.display()))?;

    let path = dir.join(MERGED_FILE);
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_merged(file, merged).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
