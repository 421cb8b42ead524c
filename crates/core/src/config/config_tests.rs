//! Tests for configuration parsing and validation.

#[cfg(test)]
mod tests {
    use std::fs;

    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    use crate::config::{load_config, parse_config, FundSource, IndexSource, MonitorConfig};
    use crate::errors::{ConfigError, Error};

    const SAMPLE: &str = r#"{
  "indexes": [
    {"name": "Nifty 50", "source": "nse_api", "params": {"index_name": "NIFTY 50"}},
    {"name": "Nasdaq-100", "source": "nasdaq_official", "params": {"index_symbol": "NDX"}},
    {"name": "VXUS", "source": "vanguard_etf", "params": {"ticker": "VXUS"}},
    {"name": "QQQM", "source": "invesco_etf"}
  ],
  "mutual_funds": [
    {"name": "Parag Parikh Flexi Cap", "source": "ppfas_mf",
     "params": {"scheme_name": "Parag Parikh Flexi Cap Fund", "fund_code": "PPFCF"}},
    {"name": "Tata ELSS", "source": "tata_mf", "params": {"sheet_code": "TTSF"}},
    {"name": "Quant Small Cap", "source": "quant_mf",
     "params": {"scheme_name": "Quant Small Cap Fund"}, "_enabled": false}
  ],
  "thresholds": {"mf_percentage_change": 1.0, "min_holding_to_report": 0.25},
  "email": {"smtp_server": "smtp.example.com", "smtp_port": 2525}
}"#;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(SAMPLE).unwrap();

        assert_eq!(config.indexes.len(), 4);
        assert_eq!(
            config.indexes[0].source,
            IndexSource::NseApi {
                index_name: "NIFTY 50".to_string()
            }
        );
        assert_eq!(
            config.indexes[3].source,
            IndexSource::InvescoEtf {
                ticker: "QQQM".to_string()
            }
        );
        assert_eq!(config.thresholds.mf_percentage_change, dec!(1.0));
        assert_eq!(config.thresholds.min_holding_to_report, dec!(0.25));
        assert_eq!(config.email.smtp_server, "smtp.example.com");
        assert_eq!(config.email.smtp_port, 2525);
        assert_eq!(config.fetch.request_delay_secs, 2);
    }

    #[test]
    fn test_disabled_funds_are_filtered() {
        let config = parse_config(SAMPLE).unwrap();

        let enabled: Vec<&str> = config.enabled_funds().map(|f| f.name.as_str()).collect();
        assert_eq!(enabled, vec!["Parag Parikh Flexi Cap", "Tata ELSS"]);
        assert_eq!(config.mutual_funds.len(), 3);
    }

    #[test]
    fn test_tata_scheme_name_falls_back_to_sheet_code() {
        let config = parse_config(SAMPLE).unwrap();
        let tata = &config.mutual_funds[1].source;

        assert!(matches!(tata, FundSource::TataMf { .. }));
        assert_eq!(tata.scheme_name(), "TTSF");
        assert_eq!(tata.source_key(), "tata_mf");
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        let err = parse_config(
            r#"{"indexes": [{"name": "Sensex", "source": "bse_api", "params": {}}]}"#,
        )
        .unwrap_err();

        match err {
            ConfigError::UnknownSource { entity, source_key } => {
                assert_eq!(entity, "Sensex");
                assert_eq!(source_key, "bse_api");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_index_source_key_is_not_a_fund_source() {
        let err = parse_config(
            r#"{"mutual_funds": [{"name": "X", "source": "nse_api", "params": {"index_name": "X"}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSource { .. }));
    }

    #[test]
    fn test_missing_required_param_is_rejected() {
        let err =
            parse_config(r#"{"indexes": [{"name": "Nifty 50", "source": "nse_api"}]}"#)
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParams { .. }));
    }

    #[test]
    fn test_negative_threshold_is_rejected() {
        let err = parse_config(r#"{"thresholds": {"mf_percentage_change": -0.5}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_partial_thresholds_keep_defaults() {
        let config = parse_config(r#"{"thresholds": {"mf_percentage_change": 2}}"#).unwrap();
        assert_eq!(config.thresholds.mf_percentage_change, dec!(2));
        assert_eq!(config.thresholds.min_holding_to_report, dec!(0.5));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config(&dir.path().join("config.json")).unwrap();

        assert_eq!(config, MonitorConfig::default());
        assert_eq!(config.thresholds.mf_percentage_change, dec!(0.5));
        assert_eq!(config.email.smtp_server, "smtp.gmail.com");
        assert_eq!(config.email.smtp_port, 587);
    }

    #[test]
    fn test_malformed_file_reports_its_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_config(&path).unwrap_err();
        match err {
            Error::Config(ConfigError::Malformed { path: reported, .. }) => {
                assert_eq!(reported, path)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
