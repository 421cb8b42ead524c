//! Ticker → company name enrichment consumed by the report formatter.

mod enrichment_traits;

pub use enrichment_traits::*;
