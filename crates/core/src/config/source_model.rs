//! Typed source kinds.
//!
//! Each configured index or fund names a `source` key and a `params` object.
//! The pair is resolved here into a closed enum, so a key no adapter exists
//! for is rejected while the configuration loads rather than during a run.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::ConfigError;

/// Where an index's constituent list comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "params", rename_all = "snake_case")]
pub enum IndexSource {
    /// National Stock Exchange of India index API.
    NseApi { index_name: String },
    /// Nasdaq-100 constituents table.
    NasdaqOfficial {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index_symbol: Option<String>,
    },
    /// Vanguard ETF holdings API.
    VanguardEtf {
        #[serde(default = "default_vanguard_ticker")]
        ticker: String,
    },
    /// Invesco ETF; only Nasdaq-100 trackers are supported.
    InvescoEtf {
        #[serde(default = "default_invesco_ticker")]
        ticker: String,
    },
}

fn default_vanguard_ticker() -> String {
    "VXUS".to_string()
}

fn default_invesco_ticker() -> String {
    "QQQM".to_string()
}

impl IndexSource {
    pub const KEYS: [&'static str; 4] = ["nse_api", "nasdaq_official", "vanguard_etf", "invesco_etf"];

    /// Resolve a configured `source` key and its `params`.
    pub fn from_parts(entity: &str, source_key: &str, params: Value) -> Result<Self, ConfigError> {
        resolve(entity, source_key, params, &Self::KEYS)
    }

    pub fn source_key(&self) -> &'static str {
        match self {
            IndexSource::NseApi { .. } => "nse_api",
            IndexSource::NasdaqOfficial { .. } => "nasdaq_official",
            IndexSource::VanguardEtf { .. } => "vanguard_etf",
            IndexSource::InvescoEtf { .. } => "invesco_etf",
        }
    }
}

/// Where a mutual fund's monthly portfolio disclosure comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "params", rename_all = "snake_case")]
pub enum FundSource {
    HdfcMf {
        scheme_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scheme_code: Option<String>,
    },
    PpfasMf {
        scheme_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fund_code: Option<String>,
    },
    TataMf {
        sheet_code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        scheme_name: Option<String>,
    },
    QuantMf {
        scheme_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sheet_keywords: Option<Vec<String>>,
    },
    BandhanMf {
        scheme_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sheet_keywords: Option<Vec<String>>,
    },
}

impl FundSource {
    pub const KEYS: [&'static str; 5] = ["hdfc_mf", "ppfas_mf", "tata_mf", "quant_mf", "bandhan_mf"];

    /// Resolve a configured `source` key and its `params`.
    pub fn from_parts(entity: &str, source_key: &str, params: Value) -> Result<Self, ConfigError> {
        resolve(entity, source_key, params, &Self::KEYS)
    }

    pub fn source_key(&self) -> &'static str {
        match self {
            FundSource::HdfcMf { .. } => "hdfc_mf",
            FundSource::PpfasMf { .. } => "ppfas_mf",
            FundSource::TataMf { .. } => "tata_mf",
            FundSource::QuantMf { .. } => "quant_mf",
            FundSource::BandhanMf { .. } => "bandhan_mf",
        }
    }

    /// Scheme name as it appears in the AMC's disclosure documents.
    pub fn scheme_name(&self) -> &str {
        match self {
            FundSource::HdfcMf { scheme_name, .. }
            | FundSource::PpfasMf { scheme_name, .. }
            | FundSource::QuantMf { scheme_name, .. }
            | FundSource::BandhanMf { scheme_name, .. } => scheme_name,
            FundSource::TataMf {
                sheet_code,
                scheme_name,
            } => scheme_name.as_deref().unwrap_or(sheet_code),
        }
    }
}

fn resolve<T: serde::de::DeserializeOwned>(
    entity: &str,
    source_key: &str,
    params: Value,
    known: &[&str],
) -> Result<T, ConfigError> {
    if !known.contains(&source_key) {
        return Err(ConfigError::UnknownSource {
            entity: entity.to_string(),
            source_key: source_key.to_string(),
        });
    }

    let params = match params {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(json!({ "source": source_key, "params": params })).map_err(|e| {
        ConfigError::InvalidParams {
            entity: entity.to_string(),
            source_key: source_key.to_string(),
            message: e.to_string(),
        }
    })
}
