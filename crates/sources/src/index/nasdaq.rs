//! Nasdaq-100 constituents, scraped from the Wikipedia constituents table.

use std::collections::BTreeSet;

use log::{info, warn};
use reqwest::Client;
use scraper::{ElementRef, Html};

use super::selector;
use crate::errors::SourceError;
use crate::http::{get_text, ACCEPT_HTML};
use crate::symbols::{clean_symbol, is_us_ticker};

const PROVIDER_ID: &str = "NASDAQ";
const WIKI_URL: &str = "https://en.wikipedia.org/wiki/Nasdaq-100";

/// Column used when no header cell names the ticker column.
const DEFAULT_TICKER_COLUMN: usize = 1;

/// Fewer constituents than this suggests the table layout changed.
const EXPECTED_MINIMUM: usize = 90;

#[derive(Clone)]
pub struct NasdaqProvider {
    client: Client,
}

impl NasdaqProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Nasdaq-100 constituents. The configured index symbol is informational;
    /// only the Nasdaq-100 page is scraped.
    pub async fn fetch(&self, index_symbol: Option<&str>) -> Result<BTreeSet<String>, SourceError> {
        info!(
            "Nasdaq: fetching {} from Wikipedia",
            index_symbol.unwrap_or("NDX")
        );
        let html = get_text(&self.client, WIKI_URL, ACCEPT_HTML, PROVIDER_ID).await?;
        let tickers = parse_constituents_page(&html)?;

        if tickers.len() < EXPECTED_MINIMUM {
            warn!(
                "Nasdaq: only found {} stocks, expected about 100",
                tickers.len()
            );
        }
        info!("Nasdaq: fetched {} constituents", tickers.len());
        Ok(tickers)
    }
}

/// Extract tickers from the constituents table of the Nasdaq-100 article.
///
/// Looks for `table#constituents` first, then any `wikitable` whose first row
/// mentions a ticker or symbol column.
pub fn parse_constituents_page(html: &str) -> Result<BTreeSet<String>, SourceError> {
    let document = Html::parse_document(html);
    let table = find_constituents_table(&document)?
        .ok_or_else(|| SourceError::not_found(PROVIDER_ID, "constituents table not found"))?;

    let row_selector = selector("tr")?;
    let cell_selector = selector("td, th")?;

    let mut rows = table.select(&row_selector);
    let ticker_column = rows
        .next()
        .map(|header| ticker_column(header, &cell_selector))
        .unwrap_or(DEFAULT_TICKER_COLUMN);

    let tickers = rows
        .filter_map(|row| row.select(&cell_selector).nth(ticker_column))
        .map(|cell| clean_symbol(&cell.text().collect::<String>()))
        .filter(|ticker| is_us_ticker(ticker))
        .collect();
    Ok(tickers)
}

fn find_constituents_table(document: &Html) -> Result<Option<ElementRef<'_>>, SourceError> {
    if let Some(table) = document.select(&selector("table#constituents")?).next() {
        return Ok(Some(table));
    }

    let row_selector = selector("tr")?;
    for table in document.select(&selector("table.wikitable")?) {
        let header_text = table
            .select(&row_selector)
            .next()
            .map(|row| row.text().collect::<String>().to_lowercase())
            .unwrap_or_default();
        if header_text.contains("ticker") || header_text.contains("symbol") {
            return Ok(Some(table));
        }
    }
    Ok(None)
}

fn ticker_column(header: ElementRef<'_>, cell_selector: &scraper::Selector) -> usize {
    header
        .select(cell_selector)
        .position(|cell| {
            let text = cell.text().collect::<String>().trim().to_lowercase();
            matches!(text.as_str(), "ticker" | "symbol" | "ticker symbol")
        })
        .unwrap_or(DEFAULT_TICKER_COLUMN)
}
