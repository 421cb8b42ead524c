//! Symbol and security name normalisation.

use std::sync::OnceLock;

use regex::Regex;

/// Replace non-breaking spaces and trim.
pub fn clean_symbol(raw: &str) -> String {
    raw.replace('\u{a0}', " ").trim().to_string()
}

/// US listing ticker: one to five upper-case letters.
pub fn is_us_ticker(symbol: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    matches_pattern(&PATTERN, r"^[A-Z]{1,5}$", symbol)
}

/// International ETF holding ticker: letters, digits, dots and slashes.
pub fn is_holding_ticker(symbol: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    matches_pattern(&PATTERN, r"^[A-Z0-9./]{1,12}$", symbol)
}

fn matches_pattern(cell: &OnceLock<Option<Regex>>, pattern: &str, symbol: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .map(|re| re.is_match(symbol))
        .unwrap_or(false)
}

/// Upper-case a security name and strip the configured suffixes, in order.
pub fn normalize_security_name(raw: &str, strip: &[&str]) -> String {
    let mut name = clean_symbol(raw).to_uppercase();
    for suffix in strip {
        name = name.replace(suffix, "");
    }
    name.trim().to_string()
}
