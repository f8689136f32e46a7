use anyhow::Result;
use log::info;
use std::fmt::Display;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::dispatch::scrape_all;
use crate::patch::{
    apply_overrides, city2zip_rows, merged_rows, write_outputs, PatchStats, CITY2ZIP_FILE,
    MERGED_FILE,
};
use crate::reference::ReferenceData;
use crate::scrape::ZipClient;
use crate::types::{City2Zip, MergedExport};
use crate::utils::osc8_file_link;

/// Settings for one scrape run
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub reference_url: String,
    pub reference_file: Option<PathBuf>,
    pub base_url: String,
    pub output_dir: PathBuf,
    pub workers: usize,
    pub timeout: Duration,
    pub limit: Option<usize>,
    pub quiet: bool,
}

/// Both exports plus patch counts
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub city2zip: Vec<City2Zip>,
    pub merged: Vec<MergedExport>,
    pub stats: PatchStats,
}

/// Scrape, patch and merge. Network access happens only through `fetch`.
pub fn run_pipeline<F, E>(
    data: &ReferenceData,
    workers: usize,
    fetch: F,
    quiet: bool,
) -> Result<PipelineOutput>
where
    F: Fn(&str) -> Result<String, E> + Sync,
    E: Display,
{
    let mut results = scrape_all(&data.cities, workers, fetch, quiet)?;
    let stats = apply_overrides(&mut results);

    Ok(PipelineOutput {
        city2zip: city2zip_rows(&results),
        merged: merged_rows(&results, &data.records),
        stats,
    })
}

pub fn run_scrape(config: &ScrapeConfig) -> Result<()> {
    let start = Instant::now();
    let client = ZipClient::new(config.timeout)?;

    let mut data = match &config.reference_file {
        Some(path) => {
            if !config.quiet {
                println!("Reading reference table from {}...", path.display());
            }
            ReferenceData::from_file(path, &config.base_url)?
        }
        None => {
            if !config.quiet {
                println!("Fetching reference table...");
            }
            ReferenceData::fetch(client.http(), &config.reference_url, &config.base_url)?
        }
    };
    info!(
        "Loaded {} reference rows, {} unique cities",
        data.records.len(),
        data.cities.len()
    );

    if let Some(limit) = config.limit {
        data.cities.truncate(limit);
    }

    if !config.quiet {
        println!(
            "Scraping ZIP codes for {} cities with {} workers...",
            data.cities.len(),
            config.workers
        );
    }

    let output = run_pipeline(
        &data,
        config.workers,
        |url: &str| client.fetch_zips(url),
        config.quiet,
    )?;

    write_outputs(&config.output_dir, &output.city2zip, &output.merged)?;

    if !config.quiet {
        let city2zip_path = config.output_dir.join(CITY2ZIP_FILE);
        let merged_path = config.output_dir.join(MERGED_FILE);
        println!(
            "\nSaved {} rows to {}",
            output.city2zip.len(),
            osc8_file_link(&city2zip_path.to_string_lossy(), CITY2ZIP_FILE)
        );
        println!(
            "Saved {} rows to {}",
            output.merged.len(),
            osc8_file_link(&merged_path.to_string_lossy(), MERGED_FILE)
        );
        println!("{}", output.stats);
        println!("Done! Runtime: {:.3}s", start.elapsed().as_secs_f64());
    }

    Ok(())
}
