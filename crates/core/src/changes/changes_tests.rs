//! Tests for the index and fund change detectors.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::changes::{diff_indexes, FundChangeDetector, IndexChangeSet, Rebalance};
    use crate::snapshot::{Holdings, IndexSnapshot};

    fn index(entries: &[(&str, &[&str])]) -> IndexSnapshot {
        entries
            .iter()
            .map(|(name, tickers)| {
                (
                    name.to_string(),
                    tickers.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
                )
            })
            .collect()
    }

    fn holdings(entries: &[(&str, Decimal)]) -> Holdings {
        entries
            .iter()
            .map(|(ticker, pct)| (ticker.to_string(), *pct))
            .collect()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // ==================== diff_indexes ====================

    #[test]
    fn test_identical_snapshots_have_no_changes() {
        let snapshot = index(&[("Nifty 50", &["RELIANCE", "TCS"]), ("NDX", &["AAPL"])]);
        assert!(diff_indexes(&snapshot, &snapshot).is_empty());
    }

    #[test]
    fn test_new_index_reports_every_ticker_as_added() {
        let changes = diff_indexes(&index(&[]), &index(&[("Idx", &["B", "A"])]));

        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes["Idx"],
            IndexChangeSet {
                added: strings(&["A", "B"]),
                removed: vec![],
            }
        );
    }

    #[test]
    fn test_vanished_index_is_not_reported() {
        let changes = diff_indexes(&index(&[("Idx", &["A", "B"])]), &index(&[]));
        assert!(changes.is_empty());
    }

    #[test]
    fn test_added_and_removed_are_sorted() {
        let changes = diff_indexes(
            &index(&[("Idx", &["A", "B", "C"])]),
            &index(&[("Idx", &["A", "F", "E", "D"])]),
        );

        assert_eq!(changes["Idx"].added, strings(&["D", "E", "F"]));
        assert_eq!(changes["Idx"].removed, strings(&["B", "C"]));
    }

    #[test]
    fn test_unchanged_index_is_omitted_among_changed_ones() {
        let changes = diff_indexes(
            &index(&[("Nifty 50", &["TCS"]), ("NDX", &["AAPL", "MSFT"])]),
            &index(&[("Nifty 50", &["TCS"]), ("NDX", &["AAPL", "NVDA"])]),
        );

        assert!(!changes.contains_key("Nifty 50"));
        assert_eq!(changes["NDX"].added, strings(&["NVDA"]));
        assert_eq!(changes["NDX"].removed, strings(&["MSFT"]));
    }

    #[test]
    fn test_index_emptied_by_failed_fetch_reports_all_removed() {
        let changes = diff_indexes(
            &index(&[("VXUS", &["ASML", "NESN"])]),
            &index(&[("VXUS", &[])]),
        );

        assert!(changes["VXUS"].added.is_empty());
        assert_eq!(changes["VXUS"].removed, strings(&["ASML", "NESN"]));
    }

    // ==================== FundChangeDetector ====================

    #[test]
    fn test_default_threshold_is_half_a_point() {
        assert_eq!(FundChangeDetector::default().threshold(), dec!(0.5));
    }

    #[test]
    fn test_identical_holdings_have_no_changes() {
        let detector = FundChangeDetector::default();
        let h = holdings(&[("HDFC BANK", dec!(8.0)), ("ITC", dec!(4.1))]);

        let changes = detector.detect_changes(&h, &h);
        assert!(!detector.has_changes(&changes));
    }

    #[test]
    fn test_delta_equal_to_threshold_is_reported() {
        let detector = FundChangeDetector::new(dec!(0.5));
        let changes = detector.detect_changes(
            &holdings(&[("X", dec!(5.0))]),
            &holdings(&[("X", dec!(5.5))]),
        );

        assert_eq!(
            changes.increases,
            vec![Rebalance {
                ticker: "X".to_string(),
                old_pct: dec!(5.0),
                new_pct: dec!(5.5),
                delta: dec!(0.5),
            }]
        );
        assert!(changes.decreases.is_empty());
    }

    #[test]
    fn test_delta_below_threshold_is_ignored() {
        let detector = FundChangeDetector::new(dec!(0.5));
        let changes = detector.detect_changes(
            &holdings(&[("X", dec!(5.0))]),
            &holdings(&[("X", dec!(5.29))]),
        );

        assert!(changes.increases.is_empty());
        assert!(!changes.has_changes());
    }

    #[test]
    fn test_exact_decimal_boundary_on_decrease() {
        let detector = FundChangeDetector::new(dec!(0.5));
        let changes = detector.detect_changes(
            &holdings(&[("X", dec!(5.3))]),
            &holdings(&[("X", dec!(4.8))]),
        );

        assert_eq!(changes.decreases.len(), 1);
        assert_eq!(changes.decreases[0].delta, dec!(-0.5));
    }

    #[test]
    fn test_additions_and_exits() {
        let detector = FundChangeDetector::default();
        let changes = detector.detect_changes(
            &holdings(&[("ITC", dec!(3.0)), ("TCS", dec!(2.2))]),
            &holdings(&[("ITC", dec!(3.1)), ("COAL INDIA", dec!(1.4))]),
        );

        assert_eq!(changes.additions.len(), 1);
        assert_eq!(changes.additions[0].ticker, "COAL INDIA");
        assert_eq!(changes.additions[0].pct, dec!(1.4));
        assert_eq!(changes.exits.len(), 1);
        assert_eq!(changes.exits[0].ticker, "TCS");
        assert_eq!(changes.exits[0].old_pct, dec!(2.2));
        assert!(changes.increases.is_empty());
        assert!(changes.decreases.is_empty());
    }

    #[test]
    fn test_zero_threshold_puts_unchanged_holdings_in_decreases() {
        let detector = FundChangeDetector::new(Decimal::ZERO);
        let changes = detector.detect_changes(
            &holdings(&[("X", dec!(2.0))]),
            &holdings(&[("X", dec!(2.0))]),
        );

        assert!(changes.increases.is_empty());
        assert_eq!(changes.decreases.len(), 1);
        assert_eq!(changes.decreases[0].delta, Decimal::ZERO);
    }

    #[test]
    fn test_empty_previous_makes_everything_an_addition() {
        let detector = FundChangeDetector::default();
        let current = holdings(&[("A", dec!(1.0)), ("B", dec!(2.0))]);
        let changes = detector.detect_changes(&Holdings::new(), &current);

        assert_eq!(changes.additions.len(), 2);
        assert!(changes.exits.is_empty());
    }

    #[test]
    fn test_empty_current_makes_everything_an_exit() {
        let detector = FundChangeDetector::default();
        let previous = holdings(&[("A", dec!(1.0)), ("B", dec!(2.0))]);
        let changes = detector.detect_changes(&previous, &Holdings::new());

        assert_eq!(changes.exits.len(), 2);
        assert!(changes.additions.is_empty());
    }
}
