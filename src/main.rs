use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

mod dispatch;
mod patch;
mod pipeline;
mod reference;
mod scrape;
mod slug;
mod types;
mod utils;

pub const REFERENCE_CSV_URL: &str =
    "https://github.com/grammakov/USA-cities-and-states/blob/master/us_cities_states_counties.csv?raw=true";
pub const LOOKUP_BASE_URL: &str = "https://codigo-postal.co/eeuu/";

#[derive(Parser)]
#[command(name = "zipscrape")]
#[command(about = "Scrape 5-digit ZIP codes for every US city from codigo-postal.co")]
struct Cli {
    /// Number of worker threads (default: available cores minus one)
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    workers: Option<u16>,

    /// Directory for city2zip.csv and us_cities_states_counties_zips.csv
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// URL of the pipe-delimited reference table of US cities
    #[arg(long, default_value = REFERENCE_CSV_URL)]
    reference_url: String,

    /// Read the reference table from a local file instead of downloading it
    #[arg(long, value_name = "PATH", conflicts_with = "reference_url")]
    reference_file: Option<PathBuf>,

    /// Base URL of the ZIP lookup site, ending in '/'
    #[arg(long, default_value = LOOKUP_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Only scrape the first N cities
    #[arg(long)]
    limit: Option<usize>,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,

    /// Set the logging level
    #[arg(short = 'l', long, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.into())
        .init();

    let mut base_url = cli.base_url;
    if !base_url.ends_with('/') {
        base_url.push('/');
    }

    let config = pipeline::ScrapeConfig {
        reference_url: cli.reference_url,
        reference_file: cli.reference_file,
        base_url,
        output_dir: cli.output_dir,
        workers: cli
            .workers
            .map(usize::from)
            .unwrap_or_else(dispatch::default_workers),
        timeout: Duration::from_secs(cli.timeout),
        limit: cli.limit,
        quiet: cli.quiet,
    };

    pipeline::run_scrape(&config)
}
