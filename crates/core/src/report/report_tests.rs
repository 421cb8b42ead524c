//! Tests for report rendering.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::changes::{
        Addition, Exit, FundChangeReport, FundChangeSet, FundChanges, IndexChangeSet,
        IndexChanges, Rebalance,
    };
    use crate::config::{parse_config, MonitorConfig};
    use crate::enrichment::{NoOpTickerResolver, TickerNameResolver};
    use crate::fetch::{EntityKind, SourceFailure};
    use crate::report::{format_fund_changes, ReportFormatter};

    struct FixedResolver {
        names: HashMap<String, String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TickerNameResolver for FixedResolver {
        fn is_available(&self) -> bool {
            true
        }

        async fn resolve(&self, diff_text: &str, _index_name: &str) -> HashMap<String, String> {
            assert!(diff_text.starts_with("Added (") || diff_text.starts_with("Removed ("));
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.names.clone()
        }
    }

    fn run_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 5).unwrap()
    }

    fn config() -> Arc<MonitorConfig> {
        Arc::new(
            parse_config(
                r#"{
  "indexes": [{"name": "VXUS", "source": "vanguard_etf", "params": {"ticker": "VXUS"}}],
  "mutual_funds": [{"name": "Tata ELSS", "source": "tata_mf", "params": {"sheet_code": "TTSF"}}]
}"#,
            )
            .unwrap(),
        )
    }

    fn formatter() -> ReportFormatter {
        ReportFormatter::new(config(), Arc::new(NoOpTickerResolver))
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample_fund_changes() -> FundChangeSet {
        FundChangeSet {
            additions: vec![
                Addition {
                    ticker: "SMALL".to_string(),
                    pct: dec!(0.8),
                },
                Addition {
                    ticker: "BIG".to_string(),
                    pct: dec!(3.25),
                },
            ],
            exits: vec![Exit {
                ticker: "GONE".to_string(),
                old_pct: dec!(2),
            }],
            increases: vec![
                Rebalance {
                    ticker: "UP1".to_string(),
                    old_pct: dec!(1.0),
                    new_pct: dec!(1.5),
                    delta: dec!(0.5),
                },
                Rebalance {
                    ticker: "UP2".to_string(),
                    old_pct: dec!(2.0),
                    new_pct: dec!(4.0),
                    delta: dec!(2.0),
                },
            ],
            decreases: vec![
                Rebalance {
                    ticker: "DOWN1".to_string(),
                    old_pct: dec!(3.0),
                    new_pct: dec!(2.4),
                    delta: dec!(-0.6),
                },
                Rebalance {
                    ticker: "DOWN2".to_string(),
                    old_pct: dec!(5.0),
                    new_pct: dec!(2.0),
                    delta: dec!(-3.0),
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_no_changes_report() {
        let report = formatter()
            .format(run_date(), &IndexChanges::new(), &FundChanges::new(), &[])
            .await;

        assert!(!report.has_changes);
        assert_eq!(report.subject, "No Portfolio Changes - 2025-12");
        assert!(report.body.starts_with("No Portfolio Changes - 2025-12\n\n"));
        assert!(report
            .body
            .contains("All monitored indexes and mutual funds remain unchanged."));
        assert!(report.body.contains("Monitored Indexes:\n  - VXUS"));
        assert!(report.body.contains("Monitored Mutual Funds:\n  - Tata ELSS"));
    }

    #[tokio::test]
    async fn test_fund_without_changes_does_not_count() {
        let mut fund_changes = FundChanges::new();
        fund_changes.insert(
            "Tata ELSS".to_string(),
            FundChangeReport {
                month: "2025-12".to_string(),
                changes: FundChangeSet::default(),
            },
        );

        let report = formatter()
            .format(run_date(), &IndexChanges::new(), &fund_changes, &[])
            .await;
        assert!(!report.has_changes);
    }

    #[tokio::test]
    async fn test_index_section() {
        let mut index_changes = IndexChanges::new();
        index_changes.insert(
            "VXUS".to_string(),
            IndexChangeSet {
                added: strings(&["ANTO", "BOL"]),
                removed: strings(&["XYZ"]),
            },
        );

        let report = formatter()
            .format(run_date(), &index_changes, &FundChanges::new(), &[])
            .await;

        assert!(report.has_changes);
        assert_eq!(report.subject, "Portfolio Changes Detected - 2025-12");
        let expected = [
            "INDEX CONSTITUENT CHANGES",
            &"=".repeat(60),
            "",
            "VXUS",
            "----",
            "Added (2):",
            "  + ANTO",
            "  + BOL",
            "",
            "Removed (1):",
            "  - XYZ",
        ]
        .join("\n");
        assert!(report.body.contains(&expected), "body was:\n{}", report.body);
        assert!(report.body.ends_with(&"=".repeat(60)));
        assert!(!report.body.contains("MUTUAL FUND HOLDINGS CHANGES"));
    }

    #[tokio::test]
    async fn test_index_section_uses_company_names() {
        let resolver = Arc::new(FixedResolver {
            names: [
                ("ANTO".to_string(), "Antofagasta plc".to_string()),
                ("XYZ".to_string(), "Unknown Company".to_string()),
            ]
            .into_iter()
            .collect(),
            calls: AtomicUsize::new(0),
        });
        let formatter = ReportFormatter::new(config(), resolver.clone());

        let mut index_changes = IndexChanges::new();
        index_changes.insert(
            "VXUS".to_string(),
            IndexChangeSet {
                added: strings(&["ANTO"]),
                removed: strings(&["XYZ"]),
            },
        );

        let report = formatter
            .format(run_date(), &index_changes, &FundChanges::new(), &[])
            .await;

        assert!(report.body.contains("  + ANTO (Antofagasta plc)"));
        assert!(report.body.contains("  - XYZ\n"));
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_fund_section_ordering_and_formatting() {
        let text = format_fund_changes("Tata ELSS", "2025-12", &sample_fund_changes());

        let expected = [
            "Tata ELSS",
            "---------",
            "Period: December 2025",
            "",
            "NEW ADDITIONS (2):",
            "  + BIG (3.2%)",
            "  + SMALL (0.8%)",
            "",
            "COMPLETE EXITS (1):",
            "  - GONE (was 2.0%)",
            "",
            "SIGNIFICANT INCREASES:",
            "  UP2: 2.0% -> 4.0% (+2.0%)",
            "  UP1: 1.0% -> 1.5% (+0.5%)",
            "",
            "SIGNIFICANT DECREASES:",
            "  DOWN2: 5.0% -> 2.0% (-3.0%)",
            "  DOWN1: 3.0% -> 2.4% (-0.6%)",
            "",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_empty_fund_changes_render_nothing() {
        assert_eq!(
            format_fund_changes("Tata ELSS", "2025-12", &FundChangeSet::default()),
            ""
        );
    }

    #[test]
    fn test_unparseable_month_is_shown_verbatim() {
        let text = format_fund_changes("F", "late 2025", &sample_fund_changes());
        assert!(text.contains("Period: late 2025"));
    }

    #[tokio::test]
    async fn test_source_issues_are_listed() {
        let failures = vec![SourceFailure {
            kind: EntityKind::Fund,
            name: "Tata ELSS".to_string(),
            source: "tata_mf".to_string(),
            reason: "no disclosure link found".to_string(),
        }];

        let report = formatter()
            .format(run_date(), &IndexChanges::new(), &FundChanges::new(), &failures)
            .await;

        assert!(!report.has_changes);
        assert!(report.body.contains("SOURCE ISSUES"));
        assert!(report
            .body
            .contains("  ! Tata ELSS (fund, tata_mf): no disclosure link found"));
    }
}
