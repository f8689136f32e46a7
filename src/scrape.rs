use scraper::{Html, Selector};
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; ZipScraper/1.0)";
pub const ZIP_LEN: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("No <table> found on {0}")]
    MissingTable(String),
}

/// Blocking HTTP client for city lookup pages
#[derive(Debug, Clone)]
pub struct ZipClient {
    client: reqwest::blocking::Client,
}

impl ZipClient {
    pub fn new(timeout: Duration) -> Result<Self, ScrapeError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn http(&self) -> &reqwest::blocking::Client {
        &self.client
    }

    /// Fetch a city page and return its ZIP codes joined by single spaces
    pub fn fetch_zips(&self, url: &str) -> Result<String, ScrapeError> {
        let html = self.client.get(url).send()?.error_for_status()?.text()?;
        extract_zips(&html).ok_or_else(|| ScrapeError::MissingTable(url.to_string()))
    }
}

/// A ZIP is exactly five ASCII digits; leading zeros are significant
pub fn is_zip(token: &str) -> bool {
    token.len() == ZIP_LEN && token.bytes().all(|b| b.is_ascii_digit())
}

/// Pull every ZIP-shaped token out of the first `<table>` on the page.
/// Returns `None` when the page has no table.
pub fn extract_zips(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let table_selector = Selector::parse("table").unwrap();
    let table = document.select(&table_selector).next()?;

    let text = table.text().collect::<Vec<_>>().join(" ");
    let zips: Vec<&str> = text.split_whitespace().filter(|t| is_zip(t)).collect();
    Some(zips.join(" "))
}
