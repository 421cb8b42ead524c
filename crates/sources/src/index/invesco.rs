//! Invesco ETFs. The Invesco site blocks automated clients, so only QQQM is
//! supported, through the Nasdaq-100 constituents it tracks.

use std::collections::BTreeSet;

use log::info;

use super::NasdaqProvider;
use crate::errors::SourceError;

const NASDAQ_TRACKERS: &[&str] = &["QQQM", "QQQ"];

#[derive(Clone)]
pub struct InvescoProvider {
    nasdaq: NasdaqProvider,
}

impl InvescoProvider {
    pub fn new(nasdaq: NasdaqProvider) -> Self {
        Self { nasdaq }
    }

    pub async fn fetch(&self, ticker: &str) -> Result<BTreeSet<String>, SourceError> {
        let ticker = ticker.trim().to_uppercase();
        if !tracks_nasdaq_100(&ticker) {
            return Err(SourceError::Unsupported(format!(
                "Invesco {ticker}: holdings require a manual download from invesco.com"
            )));
        }
        info!("Invesco {}: using Nasdaq-100 constituents", ticker);
        self.nasdaq.fetch(Some("NDX")).await
    }
}

pub fn tracks_nasdaq_100(ticker: &str) -> bool {
    NASDAQ_TRACKERS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ticker.trim()))
}
