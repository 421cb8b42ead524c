//! Change detection between two portfolio snapshots.
//!
//! Two pure detectors live here:
//!
//! - [`diff_indexes`] compares index constituent sets and reports, per index
//!   still present in the current snapshot, which tickers joined and left.
//! - [`FundChangeDetector`] compares a fund's `ticker → weight` mapping and
//!   reports additions, exits and rebalances whose magnitude reaches the
//!   configured threshold.
//!
//! Neither detector performs I/O or sorts for presentation beyond what its
//! output type promises. Rendering order belongs to [`crate::report`].

mod changes_model;
mod fund_changes;
mod index_changes;

pub use changes_model::*;
pub use fund_changes::*;
pub use index_changes::*;

#[cfg(test)]
mod changes_tests;
