//! Holdwatch Core - snapshot model, change detection and run orchestration.
//!
//! This crate holds the change-detection engine and the contracts around it.
//! It performs no network I/O itself: source adapters, the ticker name
//! resolver and the notification sink are traits implemented by the
//! `holdwatch-sources`, `holdwatch-enrichment` and `holdwatch-notify` crates.

pub mod changes;
pub mod config;
pub mod constants;
pub mod enrichment;
pub mod errors;
pub mod fetch;
pub mod monitor;
pub mod notify;
pub mod report;
pub mod snapshot;
pub mod utils;

// Re-export the types most callers need
pub use changes::{diff_indexes, FundChangeDetector, FundChangeSet, IndexChangeSet};
pub use config::{load_config, MonitorConfig};
pub use monitor::{PortfolioMonitor, RunSummary};
pub use snapshot::{JsonFileSnapshotStore, PortfolioState, SnapshotStore};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
