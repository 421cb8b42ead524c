//! Company name enrichment for index constituent changes.
//!
//! Implements [`holdwatch_core::enrichment::TickerNameResolver`] on top of an
//! Anthropic model.

mod error;
mod ticker_resolver;

pub use error::ResolverError;
pub use ticker_resolver::*;
