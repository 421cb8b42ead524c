use scraper::Selector;

use crate::errors::SourceError;

/// Compile a CSS selector.
pub(crate) fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::parse("HTML", format!("invalid selector '{css}': {e:?}")))
}
