//! Persisted portfolio state.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MONTH_FORMAT;

/// Index name → constituent tickers.
///
/// A set, so duplicate tickers collapse on construction and on load. Serialised
/// as an ascending JSON array.
pub type IndexSnapshot = BTreeMap<String, BTreeSet<String>>;

/// Stock symbol → percentage of fund assets.
pub type Holdings = BTreeMap<String, Decimal>;

/// Fund name → latest disclosure record.
pub type FundHoldingsSnapshot = BTreeMap<String, FundRecord>;

/// One fund's holdings as captured by a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundRecord {
    /// Reporting month, `YYYY-MM`
    pub month: String,
    /// Date the holdings were captured, `YYYY-MM-DD`
    pub disclosure_date: NaiveDate,
    /// Holdings already filtered to the minimum reporting weight by the adapter
    #[serde(default)]
    pub holdings: Holdings,
}

impl FundRecord {
    /// Record holdings captured on `date`.
    pub fn captured_on(date: NaiveDate, holdings: Holdings) -> Self {
        Self {
            month: date.format(MONTH_FORMAT).to_string(),
            disclosure_date: date,
            holdings,
        }
    }
}

/// The whole persisted document: one generation of monitored state.
///
/// The current run's state replaces the previous one wholesale on save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioState {
    #[serde(default)]
    pub indexes: IndexSnapshot,
    #[serde(default)]
    pub mutual_funds: FundHoldingsSnapshot,
}

impl PortfolioState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holdings of `fund`, if the fund was captured in this state.
    pub fn fund_holdings(&self, fund: &str) -> Option<&Holdings> {
        self.mutual_funds.get(fund).map(|record| &record.holdings)
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty() && self.mutual_funds.is_empty()
    }
}
