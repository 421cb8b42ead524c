//! Source registry module.
//!
//! - Routing of configured sources to adapters
//! - Fixed pacing between fetches
//! - One retry for transient failures
//! - Per-run fetch diagnostics

mod diagnostics;
mod pacer;
mod registry;

pub use diagnostics::{AttemptResult, FetchAttempt, FetchDiagnostics};
pub use pacer::RequestPacer;
pub use registry::SourceRegistry;
