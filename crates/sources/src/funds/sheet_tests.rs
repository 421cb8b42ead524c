//! Tests for sheet selection, column detection and holdings extraction.

#[cfg(test)]
mod tests {
    use calamine::Data;
    use holdwatch_core::config::FundSource;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::errors::SourceError;
    use crate::funds::{choose_sheet, locate_columns, parse_grid, Columns, DisclosureRequest, SheetGrid};

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    fn f(value: f64) -> Data {
        Data::Float(value)
    }

    fn e() -> Data {
        Data::Empty
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|n| n.to_string()).collect()
    }

    fn hdfc() -> DisclosureRequest {
        DisclosureRequest::from_source(&FundSource::HdfcMf {
            scheme_name: "HDFC Flexi Cap Fund".to_string(),
            scheme_code: None,
        })
    }

    fn ppfas() -> DisclosureRequest {
        DisclosureRequest::from_source(&FundSource::PpfasMf {
            scheme_name: "Parag Parikh Flexi Cap Fund".to_string(),
            fund_code: None,
        })
    }

    fn tata() -> DisclosureRequest {
        DisclosureRequest::from_source(&FundSource::TataMf {
            sheet_code: "TTSF96".to_string(),
            scheme_name: Some("Tata ELSS Tax Saver Fund".to_string()),
        })
    }

    fn quant() -> DisclosureRequest {
        DisclosureRequest::from_source(&FundSource::QuantMf {
            scheme_name: "Quant Small Cap Fund".to_string(),
            sheet_keywords: None,
        })
    }

    fn bandhan() -> DisclosureRequest {
        DisclosureRequest::from_source(&FundSource::BandhanMf {
            scheme_name: "Bandhan ELSS Tax Saver Fund".to_string(),
            sheet_keywords: None,
        })
    }

    fn padding_rows(count: usize) -> Vec<Vec<Data>> {
        (0..count).map(|_| vec![e()]).collect()
    }

    // ==================== Sheet choice ====================

    #[test]
    fn test_choose_sheet_by_scheme_name_or_first() {
        let sheets = names(&["Index", "HDFC Flexi Cap Fund", "HDFC Mid Cap Fund"]);
        assert_eq!(choose_sheet(&sheets, &hdfc()).unwrap(), "HDFC Flexi Cap Fund");

        let sheets = names(&["Sheet1", "Sheet2"]);
        assert_eq!(choose_sheet(&sheets, &hdfc()).unwrap(), "Sheet1");
    }

    #[test]
    fn test_choose_sheet_by_code() {
        let sheets = names(&["TTSF95", "TTSF96", "TTSF97"]);
        assert_eq!(choose_sheet(&sheets, &tata()).unwrap(), "TTSF96");

        let err = choose_sheet(&names(&["TTSF95"]), &tata()).unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
    }

    #[test]
    fn test_choose_sheet_by_keywords() {
        let sheets = names(&["Quant Active", "Quant Small Cap Fund", "SCF Old"]);
        assert_eq!(choose_sheet(&sheets, &quant()).unwrap(), "Quant Small Cap Fund");

        assert!(choose_sheet(&names(&["Quant Active"]), &quant()).is_err());
    }

    #[test]
    fn test_single_sheet_is_used_regardless_of_name() {
        assert_eq!(choose_sheet(&names(&["Portfolio"]), &bandhan()).unwrap(), "Portfolio");
        let sheets = names(&["Large Cap", "ELSS Tax Saver"]);
        assert_eq!(choose_sheet(&sheets, &bandhan()).unwrap(), "ELSS Tax Saver");
    }

    // ==================== Column layouts ====================

    #[test]
    fn test_first_row_header() {
        let grid = SheetGrid::from_rows(vec![
            vec![s("Name of Security"), s("ISIN"), s("Quantity"), s("% to NAV")],
            vec![s("HDFC Bank Ltd."), s("INE040A01034"), f(1000.0), f(8.04)],
            vec![s("ICICI Bank Limited"), s("INE090A01021"), f(900.0), f(7.25)],
            vec![s("Tiny Holding Ltd"), s("INE000000000"), f(1.0), f(0.3)],
            vec![s("Cash"), e(), e(), e()],
        ]);

        let holdings = parse_grid(&grid, &hdfc(), dec!(0.5)).unwrap();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings["HDFC BANK"], dec!(8.0));
        // banker's rounding on the exact decimal
        assert_eq!(holdings["ICICI BANK"], dec!(7.2));
    }

    #[test]
    fn test_first_row_header_without_percent_column() {
        let grid = SheetGrid::from_rows(vec![vec![s("Name"), s("Market Value")]]);
        let err = locate_columns(&grid, &hdfc().profile).unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
    }

    #[test]
    fn test_ppfas_fixed_layout_with_fractions() {
        let mut rows = padding_rows(6);
        rows.extend(vec![
            vec![e(), s("HDFC Bank Limited"), e(), e(), e(), e(), f(0.0803)],
            vec![e(), s("Bajaj Holdings & Investment Ltd."), e(), e(), e(), e(), f(0.0631)],
            vec![e(), s("Total Equity"), e(), e(), e(), e(), f(0.95)],
            vec![e(), s("(a) Listed"), e(), e(), e(), e(), f(0.9)],
            vec![e(), s("Alphabet Inc A"), e(), e(), e(), e(), f(0.0412)],
            vec![e(), s("Small Position"), e(), e(), e(), e(), f(0.004)],
        ]);
        let grid = SheetGrid::from_rows(rows);

        let holdings = parse_grid(&grid, &ppfas(), dec!(0.5)).unwrap();
        assert_eq!(holdings.len(), 3);
        assert_eq!(holdings["HDFC BANK"], dec!(8.0));
        assert_eq!(holdings["BAJAJ HOLDINGS & INVESTMENT"], dec!(6.3));
        assert_eq!(holdings["ALPHABET INC A"], dec!(4.1));
    }

    #[test]
    fn test_ppfas_rejects_values_above_cap() {
        let mut rows = padding_rows(6);
        rows.push(vec![e(), s("Oddity"), e(), e(), e(), e(), f(0.31)]);
        let grid = SheetGrid::from_rows(rows);

        assert!(parse_grid(&grid, &ppfas(), dec!(0.5)).unwrap().is_empty());
    }

    #[test]
    fn test_tata_fixed_layout_keeps_dots_and_skips_sections() {
        let mut rows = padding_rows(14);
        let row = |name: Data, pct: Data| vec![e(), name, e(), e(), e(), e(), e(), pct];
        rows.extend(vec![
            row(s("Equity & Equity Related Instruments"), e()),
            row(s("ICICI Bank Ltd."), f(6.12)),
            row(s("Dr. Reddy's Laboratories Ltd."), f(2.0)),
            row(s("Reliance Industries Ltd (Partly Paid)"), f(1.1)),
            row(s("Net Current Assets"), f(1.5)),
            row(s("Grand Total"), f(100.0)),
        ]);
        let grid = SheetGrid::from_rows(rows);

        let holdings = parse_grid(&grid, &tata(), dec!(0.5)).unwrap();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings["ICICI BANK"], dec!(6.1));
        assert_eq!(holdings["DR. REDDY'S LABORATORIES"], dec!(2.0));
    }

    #[test]
    fn test_auto_detected_header() {
        let grid = SheetGrid::from_rows(vec![
            vec![s("quant Small Cap Fund")],
            vec![s("Portfolio as on 30-Nov-2025")],
            vec![e()],
            vec![s("Sr"), s("Name of the Instrument"), s("ISIN"), s("Rating"), s("% to NAV")],
            vec![s("Equity"), e(), e(), e(), e()],
            vec![f(1.0), s("Reliance Industries Limited"), s("INE002A01018"), e(), f(9.53)],
            vec![f(2.0), s("Jio Financial Services Ltd."), s("INE758E01017"), e(), s("5.02")],
            vec![f(3.0), s("Total"), e(), e(), f(100.0)],
        ]);

        let columns = locate_columns(&grid, &quant().profile).unwrap();
        assert_eq!(
            columns,
            Columns {
                name: 1,
                pct: 4,
                data_start: 4
            }
        );

        let holdings = parse_grid(&grid, &quant(), dec!(0.5)).unwrap();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings["RELIANCE INDUSTRIES"], dec!(9.5));
        assert_eq!(holdings["JIO FINANCIAL SERVICES"], dec!(5.0));
    }

    #[test]
    fn test_auto_detect_fails_without_header() {
        let grid = SheetGrid::from_rows(vec![vec![s("Reliance"), f(9.5)]]);
        assert!(locate_columns(&grid, &quant().profile).is_err());
    }

    #[test]
    fn test_bandhan_converts_fractions_below_one() {
        let grid = SheetGrid::from_rows(vec![
            vec![s("Name of Instrument"), s("% to Net Assets")],
            vec![s("Listed Equity"), e()],
            vec![s("HDFC Bank Limited"), f(0.0784)],
            vec![s("Infosys Limited"), f(4.25)],
            vec![s("Small Co Ltd"), f(0.004)],
        ]);

        let holdings = parse_grid(&grid, &bandhan(), dec!(0.5)).unwrap();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings["HDFC BANK"], dec!(7.8));
        assert_eq!(holdings["INFOSYS"], dec!(4.2));
    }

    #[test]
    fn test_zero_minimum_keeps_everything_numeric() {
        let grid = SheetGrid::from_rows(vec![
            vec![s("Name of Instrument"), s("% to NAV")],
            vec![s("A Ltd"), f(0.0)],
            vec![s("B Ltd"), s("n/a")],
        ]);
        let holdings = parse_grid(&grid, &quant(), Decimal::ZERO).unwrap();
        assert_eq!(holdings.len(), 1);
        assert_eq!(holdings["A"], dec!(0.0));
    }
}
