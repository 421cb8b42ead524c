//! Plain-text change report.
//!
//! The formatter owns every presentation decision the detectors leave open:
//! ordering of entries, one-decimal percentages, period names and optional
//! company-name enrichment of index tickers.

mod report_formatter;
mod report_model;

pub use report_formatter::*;
pub use report_model::*;

#[cfg(test)]
mod report_tests;
