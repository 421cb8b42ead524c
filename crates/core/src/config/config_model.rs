//! Monitor configuration model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FundSource, IndexSource};
use crate::constants::{
    DEFAULT_ENRICHMENT_MAX_TOKENS, DEFAULT_ENRICHMENT_MODEL, DEFAULT_IMAP_SERVER,
    DEFAULT_INBOX_DAYS_BACK, DEFAULT_MF_PERCENTAGE_CHANGE, DEFAULT_MIN_HOLDING_TO_REPORT,
    DEFAULT_REQUEST_DELAY_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SMTP_PORT,
    DEFAULT_SMTP_SERVER,
};

/// Immutable configuration for one run, built once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonitorConfig {
    pub indexes: Vec<IndexConfig>,
    pub mutual_funds: Vec<FundConfig>,
    pub thresholds: Thresholds,
    pub email: EmailSettings,
    pub fetch: FetchSettings,
    pub inbox: InboxSettings,
    pub enrichment: EnrichmentSettings,
}

impl MonitorConfig {
    /// Funds that should be fetched this run.
    pub fn enabled_funds(&self) -> impl Iterator<Item = &FundConfig> {
        self.mutual_funds.iter().filter(|fund| fund.enabled)
    }
}

/// One monitored index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    pub name: String,
    pub source: IndexSource,
}

/// One monitored mutual fund.
#[derive(Debug, Clone, PartialEq)]
pub struct FundConfig {
    pub name: String,
    pub source: FundSource,
    /// `_enabled` in the file; disabled funds are neither fetched nor stored
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum rebalance magnitude reported, in percentage points
    pub mf_percentage_change: Decimal,
    /// Minimum holding weight adapters keep, in percent
    pub min_holding_to_report: Decimal,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            mf_percentage_change: DEFAULT_MF_PERCENTAGE_CHANGE,
            min_holding_to_report: DEFAULT_MIN_HOLDING_TO_REPORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailSettings {
    pub smtp_server: String,
    pub smtp_port: u16,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            smtp_server: DEFAULT_SMTP_SERVER.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
        }
    }
}

/// Pacing and timeouts for source fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub request_delay_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            request_delay_secs: DEFAULT_REQUEST_DELAY_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Disclosure email search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InboxSettings {
    pub imap_server: String,
    pub days_back: u32,
}

impl Default for InboxSettings {
    fn default() -> Self {
        Self {
            imap_server: DEFAULT_IMAP_SERVER.to_string(),
            days_back: DEFAULT_INBOX_DAYS_BACK,
        }
    }
}

/// Ticker → company name lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentSettings {
    pub model: String,
    pub max_tokens: u32,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_ENRICHMENT_MODEL.to_string(),
            max_tokens: DEFAULT_ENRICHMENT_MAX_TOKENS,
        }
    }
}
