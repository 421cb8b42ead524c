//! Vanguard ETF holdings from the public fund profile API.
//!
//! The API returns the top holdings by weight; `size` reports how many the
//! fund actually holds.

use std::collections::BTreeSet;

use log::info;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::SourceError;
use crate::http::get_json;
use crate::symbols::{clean_symbol, is_holding_ticker};

const PROVIDER_ID: &str = "VANGUARD";
const API_BASE_URL: &str = "https://investor.vanguard.com/investment-products/etfs/profile/api";

#[derive(Debug, Default, Deserialize)]
pub struct VanguardHoldingsResponse {
    #[serde(default)]
    pub fund: VanguardFund,
    #[serde(default)]
    pub size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VanguardFund {
    #[serde(default)]
    pub entity: Vec<VanguardHolding>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VanguardHolding {
    #[serde(default)]
    pub ticker: Option<String>,
}

#[derive(Clone)]
pub struct VanguardProvider {
    client: Client,
}

impl VanguardProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, ticker: &str) -> Result<BTreeSet<String>, SourceError> {
        let ticker = ticker.trim().to_uppercase();
        let url = holdings_url(&ticker);
        info!("Vanguard: fetching holdings for {}", ticker);

        let response: VanguardHoldingsResponse = get_json(&self.client, &url, PROVIDER_ID).await?;
        let holdings = parse_holdings(&response);

        let returned = response.fund.entity.len();
        match response.size {
            Some(total) if total > returned => info!(
                "Vanguard {}: tracking top {} of {} total holdings",
                ticker,
                holdings.len(),
                total
            ),
            _ => info!("Vanguard {}: fetched {} holdings", ticker, holdings.len()),
        }
        Ok(holdings)
    }
}

pub fn holdings_url(ticker: &str) -> String {
    format!("{API_BASE_URL}/{ticker}/portfolio-holding/stock")
}

pub fn parse_holdings(response: &VanguardHoldingsResponse) -> BTreeSet<String> {
    response
        .fund
        .entity
        .iter()
        .filter_map(|holding| holding.ticker.as_deref())
        .map(clean_symbol)
        .filter(|ticker| is_holding_ticker(ticker))
        .collect()
}
