use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::changes::{FundChanges, IndexChanges};
use crate::fetch::SourceFailure;
use crate::report::Report;

/// What happened to the notification for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum NotificationStatus {
    Sent,
    /// Delivery turned off for this run
    Disabled,
    /// No credentials were configured
    Skipped,
    Failed(String),
}

/// Everything a completed run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_date: NaiveDate,
    pub index_changes: IndexChanges,
    /// Funds with at least one change
    pub fund_changes: FundChanges,
    pub failures: Vec<SourceFailure>,
    pub report: Report,
    pub notification: NotificationStatus,
}

impl RunSummary {
    pub fn has_changes(&self) -> bool {
        self.report.has_changes
    }
}
