//! Enrichment error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolverError {
    /// No API key configured.
    #[error("Missing API key for provider {0}")]
    MissingApiKey(String),

    /// Client construction or completion request failed.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The model answered with something other than a JSON object.
    #[error("Unparseable response: {0}")]
    InvalidResponse(String),
}

impl ResolverError {
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }
}
