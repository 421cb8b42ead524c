//! Ticker to company name resolution with an Anthropic model.
//!
//! The model sees the rendered diff of one index and answers with a JSON
//! object mapping each ticker to a company name. Anything that goes wrong is
//! logged and yields an empty mapping, so the report falls back to bare
//! tickers.

use std::collections::HashMap;

use async_trait::async_trait;
use holdwatch_core::constants::{DEFAULT_ENRICHMENT_MAX_TOKENS, DEFAULT_ENRICHMENT_MODEL};
use holdwatch_core::enrichment::{TickerNameResolver, UNKNOWN_COMPANY};
use log::{debug, error, info, warn};
use reqwest::Client as HttpClient;
use rig::{
    client::CompletionClient,
    completion::Prompt,
    providers::anthropic,
};

use crate::error::ResolverError;

const PROVIDER_ID: &str = "anthropic";

/// Index names containing one of these trade on Indian exchanges.
const INDIAN_MARKET_KEYWORDS: &[&str] = &["nifty", "sensex", "bse", "nse"];

/// Resolver settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub model: String,
    pub max_tokens: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_ENRICHMENT_MODEL.to_string(),
            max_tokens: DEFAULT_ENRICHMENT_MAX_TOKENS,
        }
    }
}

pub struct AnthropicTickerResolver {
    api_key: Option<String>,
    config: ResolverConfig,
}

impl AnthropicTickerResolver {
    /// A resolver without a key is valid but unavailable.
    pub fn new(api_key: Option<String>, config: ResolverConfig) -> Self {
        let api_key = api_key.filter(|key| !key.is_empty());
        if api_key.is_some() {
            info!("Ticker resolver using {} model {}", PROVIDER_ID, config.model);
        } else {
            warn!("ANTHROPIC_API_KEY not set, ticker names will not be resolved");
        }
        Self { api_key, config }
    }

    async fn resolve_with_llm(
        &self,
        diff_text: &str,
        index_name: &str,
    ) -> Result<HashMap<String, String>, ResolverError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ResolverError::MissingApiKey(PROVIDER_ID.to_string()))?;

        debug!(
            "Resolving tickers for {} with model {}",
            index_name, self.config.model
        );
        let prompt = build_prompt(diff_text, index_name);
        let client: anthropic::Client<HttpClient> =
            anthropic::Client::new(key).map_err(|e| ResolverError::provider(e.to_string()))?;
        let response = client
            .agent(&self.config.model)
            .max_tokens(u64::from(self.config.max_tokens))
            .build()
            .prompt(&prompt)
            .await
            .map_err(|e| ResolverError::provider(e.to_string()))?;

        parse_name_map(&response)
    }
}

#[async_trait]
impl TickerNameResolver for AnthropicTickerResolver {
    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn resolve(&self, diff_text: &str, index_name: &str) -> HashMap<String, String> {
        if !self.is_available() {
            return HashMap::new();
        }
        match self.resolve_with_llm(diff_text, index_name).await {
            Ok(names) => {
                info!("Resolved {} tickers for {}", names.len(), index_name);
                names
            }
            Err(e) => {
                error!("Error resolving tickers for {}: {}", index_name, e);
                HashMap::new()
            }
        }
    }
}

pub fn is_indian_market(index_name: &str) -> bool {
    let lower = index_name.to_lowercase();
    INDIAN_MARKET_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn market_context(index_name: &str) -> &'static str {
    if is_indian_market(index_name) {
        "Indian stock market (NSE/BSE)"
    } else {
        "International stock market"
    }
}

pub fn build_prompt(diff_text: &str, index_name: &str) -> String {
    let market = market_context(index_name);
    format!(
        "Given the following portfolio changes from {index_name} (which tracks {market}), \
please identify all the ticker symbols and provide their full company names.\n\n\
Diff text:\n{diff_text}\n\n\
Please analyze the ticker symbols and return them in the following JSON format:\n\
{{\n  \"TICKER1\": \"Full Company Name 1\",\n  \"TICKER2\": \"Full Company Name 2\",\n  ...\n}}\n\n\
Important guidelines:\n\
1. For {market}, focus on stocks from that market\n\
2. Ticker symbols are typically 1-6 characters (uppercase letters/numbers)\n\
3. If you see numbers like \"012330\", these are stock codes (especially for international markets)\n\
4. For Indian stocks, tickers are usually 1-5 uppercase letters (e.g., TCS, INFY, RELIANCE)\n\
5. For international stocks, they can be letters with numbers (e.g., 2383, 6920)\n\
6. Provide the most commonly known company name\n\
7. If a ticker is ambiguous or unknown, use \"{UNKNOWN_COMPANY}\" as the value\n\n\
Return ONLY the JSON object, nothing else."
    )
}

/// Drop a surrounding markdown code fence (```json ... ```), if any.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let body = trimmed
        .split_once('\n')
        .map(|(_, rest)| rest)
        .unwrap_or_default();
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Parse the model's answer into a ticker → company mapping. Non-string
/// values are ignored.
pub fn parse_name_map(response: &str) -> Result<HashMap<String, String>, ResolverError> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(response))
        .map_err(|e| ResolverError::InvalidResponse(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| ResolverError::InvalidResponse("expected a JSON object".to_string()))?;

    Ok(object
        .iter()
        .filter_map(|(ticker, name)| {
            name.as_str()
                .map(|name| (ticker.trim().to_string(), name.trim().to_string()))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_detection() {
        assert!(is_indian_market("Nifty 50"));
        assert!(is_indian_market("S&P BSE Sensex"));
        assert!(!is_indian_market("VXUS"));
        assert!(!is_indian_market("Nasdaq 100"));
    }

    #[test]
    fn test_prompt_mentions_market_and_diff() {
        let prompt = build_prompt("Added: + ANTO, + BOL", "VXUS");
        assert!(prompt.contains("from VXUS (which tracks International stock market)"));
        assert!(prompt.contains("Diff text:\nAdded: + ANTO, + BOL\n"));
        assert!(prompt.contains("\"Unknown Company\""));
        assert!(prompt.ends_with("Return ONLY the JSON object, nothing else."));

        let prompt = build_prompt("Added: + ETERNAL", "Nifty 50");
        assert!(prompt.contains("Indian stock market (NSE/BSE)"));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"A\": \"B\"}\n```"), "{\"A\": \"B\"}");
        assert_eq!(strip_code_fence("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fence("  {\"A\": \"B\"} "), "{\"A\": \"B\"}");
    }

    #[test]
    fn test_parse_name_map() {
        let names = parse_name_map(
            "```json\n{\"ANTO\": \"Antofagasta plc\", \"BOL\": \"Boliden AB\", \"X\": 1}\n```",
        )
        .unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names["ANTO"], "Antofagasta plc");
    }

    #[test]
    fn test_parse_name_map_rejects_non_objects() {
        assert!(matches!(
            parse_name_map("[\"ANTO\"]"),
            Err(ResolverError::InvalidResponse(_))
        ));
        assert!(parse_name_map("Sorry, I cannot help with that.").is_err());
    }

    #[tokio::test]
    async fn test_resolver_without_key_is_unavailable() {
        let resolver = AnthropicTickerResolver::new(Some(String::new()), ResolverConfig::default());
        assert!(!resolver.is_available());
        assert!(resolver.resolve("Added: + ANTO", "VXUS").await.is_empty());
    }
}
