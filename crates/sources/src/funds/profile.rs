//! Per-AMC disclosure profiles.
//!
//! Every AMC publishes its monthly portfolio differently. A profile captures
//! where to look, which link to take, which sheet to read and how rows are
//! laid out, so one pipeline can serve all of them.

use holdwatch_core::config::FundSource;
use rust_decimal::Decimal;

const HDFC_PAGE: &str = "https://www.hdfcfund.com/statutory-disclosure/portfolio/monthly-portfolio";
const PPFAS_PAGE: &str = "https://amc.ppfas.com/downloads/portfolio-disclosure/";
const TATA_PAGE: &str =
    "https://www.advisorkhoj.com/form-download-centre/Mutual/Tata-Mutual-Fund/Monthly-Portfolio-Disclosures";
const QUANT_PAGE: &str =
    "https://www.advisorkhoj.com/form-download-centre/Mutual-Funds/Quant-Mutual-Fund/Monthly-Portfolio-Disclosures";
const BANDHAN_PAGE: &str =
    "https://www.advisorkhoj.com/form-download-centre/Mutual-Funds/Bandhan-Mutual-Fund/Monthly-Portfolio-Disclosures";

const PPFAS_SKIP: &[&str] = &[
    "TOTAL", "GRAND", "RETURNS", "SINCE INCEPTION", "MARKET VALUE", "LAST", "YEARS", "NIFTY",
    "SENSEX", "DATE", "PORTFOLIO", "EQUITY", "DEBT", "CASH", "SCHEME", "FUND", "ASSET", "NAV",
    "AWAITING", "LISTED", "GOVERNMENT", "TREASURY", "CLEARING",
];
const TATA_SKIP: &[&str] = &[
    "EQUITY", "LISTED", "AWAITING", "TOTAL", "GRAND", "UNLISTED", "SECURITIES", "DEBT", "MONEY",
    "CASH", "NET", "INVESTMENT", "NAME OF",
];
const QUANT_SKIP: &[&str] = &[
    "EQUITY", "TOTAL", "GRAND", "DEBT", "CASH", "NAME OF", "INSTRUMENT", "SECURITY", "PORTFOLIO",
];
const BANDHAN_SKIP: &[&str] = &[
    "EQUITY", "TOTAL", "GRAND", "DEBT", "CASH", "NAME OF", "INSTRUMENT", "SECURITY", "PORTFOLIO",
    "LISTED", "UNLISTED",
];

const STRIP_WITH_DOTS: &[&str] = &[" LTD", " LIMITED", "."];
const STRIP_LIMITED_FIRST: &[&str] = &[" LIMITED", " LTD", "."];
const STRIP_KEEP_DOTS: &[&str] = &[" LTD.", " LTD", " LIMITED"];

const QUANT_SHEET_KEYWORDS: &[&str] = &["small cap", "scf"];
const BANDHAN_SHEET_KEYWORDS: &[&str] = &["elss"];

/// Single holdings above this share are PPFAS metadata rows, not positions.
const PPFAS_MAX_PCT: i64 = 25;

/// Which link on the disclosure page holds the workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRule {
    /// href has the extension and the link names the scheme (or its code).
    Scheme { extension: &'static str },
    /// href has the extension and the link text carries a month or year.
    Dated { extension: &'static str },
}

/// How the fund's sheet is chosen inside the workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetChoice {
    /// First sheet whose name contains the scheme name, else the first sheet.
    SchemeNameOrFirst,
    First,
    /// Sheet named exactly by the configured code.
    Code,
    /// First sheet whose name contains one of the sheet keywords.
    Keywords,
    /// The only sheet of a single-sheet workbook, else by keywords.
    SingleOrKeywords,
}

/// Where the security name and percentage columns are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnLayout {
    Fixed {
        name_col: usize,
        pct_col: usize,
        data_start: usize,
    },
    /// Row 0 holds the headers; data starts on row 1.
    FirstRowHeader,
    /// Header row found by scanning the first rows of the sheet.
    AutoDetect,
}

/// Unit of the percentage column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentScale {
    Percent,
    /// Always a fraction of one (0.0803 means 8.03 %).
    Fraction,
    /// Values strictly between 0 and 1 are fractions.
    FractionBelowOne,
}

/// Keyword used to pick the disclosure email of the fund.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboxKeyword {
    Fixed(&'static str),
    FirstWordOfScheme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboxRule {
    /// Sender filter.
    pub amc: &'static str,
    pub keyword: InboxKeyword,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmcProfile {
    pub id: &'static str,
    pub page_url: &'static str,
    pub inbox: Option<InboxRule>,
    pub link_rule: LinkRule,
    pub sheet: SheetChoice,
    pub default_sheet_keywords: &'static [&'static str],
    pub layout: ColumnLayout,
    pub skip_keywords: &'static [&'static str],
    pub skip_paren_prefix: bool,
    pub skip_paren_suffix: bool,
    pub strip: &'static [&'static str],
    pub scale: PercentScale,
    pub max_pct: Option<Decimal>,
}

impl AmcProfile {
    pub fn hdfc() -> Self {
        Self {
            id: "HDFC",
            page_url: HDFC_PAGE,
            inbox: None,
            link_rule: LinkRule::Scheme { extension: ".xlsx" },
            sheet: SheetChoice::SchemeNameOrFirst,
            default_sheet_keywords: &[],
            layout: ColumnLayout::FirstRowHeader,
            skip_keywords: &[],
            skip_paren_prefix: false,
            skip_paren_suffix: false,
            strip: STRIP_WITH_DOTS,
            scale: PercentScale::Percent,
            max_pct: None,
        }
    }

    pub fn ppfas() -> Self {
        Self {
            id: "PPFAS",
            page_url: PPFAS_PAGE,
            inbox: Some(InboxRule {
                amc: "Parag Parikh",
                keyword: InboxKeyword::FirstWordOfScheme,
            }),
            link_rule: LinkRule::Scheme { extension: ".xls" },
            sheet: SheetChoice::First,
            default_sheet_keywords: &[],
            layout: ColumnLayout::Fixed {
                name_col: 1,
                pct_col: 6,
                data_start: 6,
            },
            skip_keywords: PPFAS_SKIP,
            skip_paren_prefix: true,
            skip_paren_suffix: false,
            strip: STRIP_LIMITED_FIRST,
            scale: PercentScale::Fraction,
            max_pct: Some(Decimal::from(PPFAS_MAX_PCT)),
        }
    }

    pub fn tata() -> Self {
        Self {
            id: "TATA",
            page_url: TATA_PAGE,
            inbox: Some(InboxRule {
                amc: "Tata",
                keyword: InboxKeyword::Fixed("ELSS"),
            }),
            link_rule: LinkRule::Dated { extension: ".xlsx" },
            sheet: SheetChoice::Code,
            default_sheet_keywords: &[],
            layout: ColumnLayout::Fixed {
                name_col: 1,
                pct_col: 7,
                data_start: 14,
            },
            skip_keywords: TATA_SKIP,
            skip_paren_prefix: true,
            skip_paren_suffix: true,
            strip: STRIP_KEEP_DOTS,
            scale: PercentScale::Percent,
            max_pct: None,
        }
    }

    pub fn quant() -> Self {
        Self {
            id: "QUANT",
            page_url: QUANT_PAGE,
            inbox: Some(InboxRule {
                amc: "Quant",
                keyword: InboxKeyword::Fixed("Small Cap"),
            }),
            link_rule: LinkRule::Dated { extension: ".xls" },
            sheet: SheetChoice::Keywords,
            default_sheet_keywords: QUANT_SHEET_KEYWORDS,
            layout: ColumnLayout::AutoDetect,
            skip_keywords: QUANT_SKIP,
            skip_paren_prefix: false,
            skip_paren_suffix: false,
            strip: STRIP_WITH_DOTS,
            scale: PercentScale::Percent,
            max_pct: None,
        }
    }

    pub fn bandhan() -> Self {
        Self {
            id: "BANDHAN",
            page_url: BANDHAN_PAGE,
            inbox: Some(InboxRule {
                amc: "Bandhan",
                keyword: InboxKeyword::Fixed("ELSS"),
            }),
            link_rule: LinkRule::Dated { extension: ".xls" },
            sheet: SheetChoice::SingleOrKeywords,
            default_sheet_keywords: BANDHAN_SHEET_KEYWORDS,
            layout: ColumnLayout::AutoDetect,
            skip_keywords: BANDHAN_SKIP,
            skip_paren_prefix: false,
            skip_paren_suffix: false,
            strip: STRIP_WITH_DOTS,
            scale: PercentScale::FractionBelowOne,
            max_pct: None,
        }
    }
}

/// One fund's disclosure lookup: its AMC profile plus the configured
/// identifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct DisclosureRequest {
    pub profile: AmcProfile,
    pub scheme_name: String,
    /// Short code that may appear in link text or href (PPFAS fund code).
    pub link_code: Option<String>,
    pub sheet_code: Option<String>,
    pub sheet_keywords: Vec<String>,
}

impl DisclosureRequest {
    pub fn from_source(source: &FundSource) -> Self {
        match source {
            FundSource::HdfcMf { scheme_name, .. } => {
                Self::new(AmcProfile::hdfc(), scheme_name, None, None, None)
            }
            FundSource::PpfasMf {
                scheme_name,
                fund_code,
            } => Self::new(AmcProfile::ppfas(), scheme_name, fund_code.clone(), None, None),
            FundSource::TataMf { sheet_code, .. } => Self::new(
                AmcProfile::tata(),
                source.scheme_name(),
                None,
                Some(sheet_code.clone()),
                None,
            ),
            FundSource::QuantMf {
                scheme_name,
                sheet_keywords,
            } => Self::new(AmcProfile::quant(), scheme_name, None, None, sheet_keywords.clone()),
            FundSource::BandhanMf {
                scheme_name,
                sheet_keywords,
            } => Self::new(
                AmcProfile::bandhan(),
                scheme_name,
                None,
                None,
                sheet_keywords.clone(),
            ),
        }
    }

    fn new(
        profile: AmcProfile,
        scheme_name: &str,
        link_code: Option<String>,
        sheet_code: Option<String>,
        sheet_keywords: Option<Vec<String>>,
    ) -> Self {
        let sheet_keywords = sheet_keywords
            .filter(|keywords| !keywords.is_empty())
            .unwrap_or_else(|| {
                profile
                    .default_sheet_keywords
                    .iter()
                    .map(|k| k.to_string())
                    .collect()
            });
        Self {
            profile,
            scheme_name: scheme_name.trim().to_string(),
            link_code: link_code
                .map(|code| code.trim().to_string())
                .filter(|code| !code.is_empty()),
            sheet_code,
            sheet_keywords,
        }
    }

    /// Sender and keyword for the inbox search, when the AMC mails its
    /// disclosures.
    pub fn inbox_query(&self) -> Option<(&'static str, String)> {
        let rule = self.profile.inbox?;
        let keyword = match rule.keyword {
            InboxKeyword::Fixed(keyword) => keyword.to_string(),
            InboxKeyword::FirstWordOfScheme => self
                .scheme_name
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string(),
        };
        Some((rule.amc, keyword))
    }
}
