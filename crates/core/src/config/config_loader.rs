//! Reads `config.json` into a validated [`MonitorConfig`].

use std::fs;
use std::path::Path;

use log::{debug, warn};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use super::{
    EmailSettings, EnrichmentSettings, FetchSettings, FundConfig, FundSource, IndexConfig,
    IndexSource, InboxSettings, MonitorConfig, Thresholds,
};
use crate::errors::{ConfigError, Result};

/// On-disk shape before source keys are resolved.
#[derive(Debug, Deserialize)]
struct RawMonitorConfig {
    #[serde(default)]
    indexes: Vec<RawSourceEntry>,
    #[serde(default)]
    mutual_funds: Vec<RawSourceEntry>,
    #[serde(default)]
    thresholds: Thresholds,
    #[serde(default)]
    email: EmailSettings,
    #[serde(default)]
    fetch: FetchSettings,
    #[serde(default)]
    inbox: InboxSettings,
    #[serde(default)]
    enrichment: EnrichmentSettings,
}

#[derive(Debug, Deserialize)]
struct RawSourceEntry {
    name: String,
    source: String,
    #[serde(default)]
    params: Value,
    #[serde(rename = "_enabled", default = "default_enabled")]
    enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Load the monitor configuration from `path`.
///
/// A missing file yields the default configuration. Any other problem is a
/// [`ConfigError`].
pub fn load_config(path: &Path) -> Result<MonitorConfig> {
    if !path.exists() {
        warn!(
            "No configuration at {}, using defaults (nothing is monitored)",
            path.display()
        );
        return Ok(MonitorConfig::default());
    }

    let raw = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let config = parse_config(&raw).map_err(|err| match err {
        ConfigError::Malformed { message, .. } => ConfigError::Malformed {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })?;

    debug!(
        "Loaded configuration: {} index(es), {} fund(s)",
        config.indexes.len(),
        config.mutual_funds.len()
    );
    Ok(config)
}

/// Parse and validate a configuration document.
pub fn parse_config(raw: &str) -> std::result::Result<MonitorConfig, ConfigError> {
    let raw: RawMonitorConfig =
        serde_json::from_str(raw).map_err(|e| ConfigError::Malformed {
            path: Default::default(),
            message: e.to_string(),
        })?;

    validate_thresholds(&raw.thresholds)?;

    let indexes = raw
        .indexes
        .into_iter()
        .map(|entry| {
            let source = IndexSource::from_parts(&entry.name, &entry.source, entry.params)?;
            if !entry.enabled {
                warn!("'_enabled' is ignored for index '{}'", entry.name);
            }
            Ok(IndexConfig {
                name: entry.name,
                source,
            })
        })
        .collect::<std::result::Result<Vec<_>, ConfigError>>()?;

    let mutual_funds = raw
        .mutual_funds
        .into_iter()
        .map(|entry| {
            let source = FundSource::from_parts(&entry.name, &entry.source, entry.params)?;
            Ok(FundConfig {
                name: entry.name,
                source,
                enabled: entry.enabled,
            })
        })
        .collect::<std::result::Result<Vec<_>, ConfigError>>()?;

    Ok(MonitorConfig {
        indexes,
        mutual_funds,
        thresholds: raw.thresholds,
        email: raw.email,
        fetch: raw.fetch,
        inbox: raw.inbox,
        enrichment: raw.enrichment,
    })
}

fn validate_thresholds(thresholds: &Thresholds) -> std::result::Result<(), ConfigError> {
    if thresholds.mf_percentage_change < Decimal::ZERO {
        return Err(ConfigError::InvalidValue(format!(
            "thresholds.mf_percentage_change must not be negative (got {})",
            thresholds.mf_percentage_change
        )));
    }
    if thresholds.min_holding_to_report < Decimal::ZERO {
        return Err(ConfigError::InvalidValue(format!(
            "thresholds.min_holding_to_report must not be negative (got {})",
            thresholds.min_holding_to_report
        )));
    }
    Ok(())
}
