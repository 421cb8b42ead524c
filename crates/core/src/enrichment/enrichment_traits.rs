use std::collections::HashMap;

use async_trait::async_trait;

/// Placeholder a resolver returns for tickers it cannot name. Never rendered.
pub const UNKNOWN_COMPANY: &str = "Unknown Company";

/// Resolves ticker symbols found in a diff to company names.
///
/// Enrichment is best effort: implementations log their own failures and
/// return an empty map instead of an error.
#[async_trait]
pub trait TickerNameResolver: Send + Sync {
    /// Whether the resolver is configured well enough to be worth calling.
    fn is_available(&self) -> bool;

    /// Resolve the tickers mentioned in `diff_text`, which lists changes of
    /// `index_name`.
    async fn resolve(&self, diff_text: &str, index_name: &str) -> HashMap<String, String>;
}

/// Resolver used when no language model is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpTickerResolver;

#[async_trait]
impl TickerNameResolver for NoOpTickerResolver {
    fn is_available(&self) -> bool {
        false
    }

    async fn resolve(&self, _diff_text: &str, _index_name: &str) -> HashMap<String, String> {
        HashMap::new()
    }
}

/// Render tickers as `TICKER (Company)` where a usable name is known.
pub fn format_with_company_names(
    tickers: &[String],
    names: &HashMap<String, String>,
) -> Vec<String> {
    tickers
        .iter()
        .map(|ticker| match names.get(ticker) {
            Some(name) if !name.is_empty() && name != UNKNOWN_COMPANY => {
                format!("{ticker} ({name})")
            }
            _ => ticker.clone(),
        })
        .collect()
}
