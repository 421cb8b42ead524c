//! National Stock Exchange of India index constituents.
//!
//! The JSON API needs the cookies the home page sets, so every fetch warms up
//! the session first. When the API fails or returns nothing, the static
//! constituent CSV from the exchange archive is used instead.

use std::collections::BTreeSet;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::errors::SourceError;
use crate::http::{get_json, get_text, ACCEPT_HTML};
use crate::symbols::clean_symbol;

const PROVIDER_ID: &str = "NSE";
const HOME_URL: &str = "https://www.nseindia.com";
const API_URL: &str = "https://www.nseindia.com/api/equity-stockIndices";
const ARCHIVE_URL: &str = "https://archives.nseindia.com/content/indices";

/// Pause between the cookie warm-up and the API call.
const WARM_UP_PAUSE: Duration = Duration::from_secs(1);

/// Symbol column of the archive CSV (Company Name, Industry, Symbol, ...).
const ARCHIVE_SYMBOL_COLUMN: usize = 2;

#[derive(Debug, Default, Deserialize)]
pub struct NseIndexResponse {
    #[serde(default)]
    pub data: Vec<NseConstituent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NseConstituent {
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Clone)]
pub struct NseProvider {
    client: Client,
}

impl NseProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, index_name: &str) -> Result<BTreeSet<String>, SourceError> {
        match self.fetch_api(index_name).await {
            Ok(symbols) if !symbols.is_empty() => {
                info!("NSE API: fetched {} constituents for {}", symbols.len(), index_name);
                return Ok(symbols);
            }
            Ok(_) => warn!("NSE API returned no constituents for {}", index_name),
            Err(e) => warn!("NSE API error for {}: {}", index_name, e),
        }

        let url = archive_csv_url(index_name);
        info!("NSE CSV fallback: fetching {}", url);
        let body = get_text(&self.client, &url, "text/csv,*/*", PROVIDER_ID).await?;
        let symbols = parse_archive_csv(&body, index_name)?;
        info!("NSE CSV: fetched {} constituents for {}", symbols.len(), index_name);
        Ok(symbols)
    }

    async fn fetch_api(&self, index_name: &str) -> Result<BTreeSet<String>, SourceError> {
        if let Err(e) = get_text(&self.client, HOME_URL, ACCEPT_HTML, PROVIDER_ID).await {
            debug!("NSE warm-up request failed: {}", e);
        }
        tokio::time::sleep(WARM_UP_PAUSE).await;

        let url = api_url(index_name);
        let response: NseIndexResponse = get_json(&self.client, &url, PROVIDER_ID).await?;
        Ok(parse_api_response(&response, index_name))
    }
}

pub fn api_url(index_name: &str) -> String {
    format!("{}?index={}", API_URL, urlencoding::encode(index_name))
}

/// `NIFTY NEXT 50` → `.../ind_niftynext50list.csv`
pub fn archive_csv_url(index_name: &str) -> String {
    let slug: String = index_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    format!("{ARCHIVE_URL}/ind_{slug}list.csv")
}

/// Constituent symbols from the API response. The index itself appears as a
/// row and is dropped.
pub fn parse_api_response(response: &NseIndexResponse, index_name: &str) -> BTreeSet<String> {
    response
        .data
        .iter()
        .filter_map(|item| item.symbol.as_deref())
        .map(clean_symbol)
        .filter(|symbol| !symbol.is_empty() && symbol != index_name)
        .collect()
}

pub fn parse_archive_csv(body: &str, index_name: &str) -> Result<BTreeSet<String>, SourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut symbols = BTreeSet::new();
    for record in reader.records() {
        let record = record.map_err(|e| SourceError::parse(PROVIDER_ID, e.to_string()))?;
        if let Some(field) = record.get(ARCHIVE_SYMBOL_COLUMN) {
            let symbol = clean_symbol(field);
            if !symbol.is_empty() && symbol != index_name {
                symbols.insert(symbol);
            }
        }
    }
    Ok(symbols)
}
