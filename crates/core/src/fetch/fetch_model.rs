use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::snapshot::Holdings;

/// Result of fetching one source.
///
/// `Empty` and `Failed` both contribute an empty fragment to the current
/// snapshot. They are kept apart so a run can tell "the source legitimately
/// has nothing" from "the fetch went wrong" without inspecting log output.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Data(T),
    Empty,
    Failed { reason: String },
}

impl<T: Default> FetchOutcome<T> {
    /// The fragment to store: the data, or an empty value.
    pub fn into_fragment(self) -> T {
        match self {
            FetchOutcome::Data(data) => data,
            FetchOutcome::Empty | FetchOutcome::Failed { .. } => T::default(),
        }
    }
}

impl<T> FetchOutcome<T> {
    pub fn failed(reason: impl Into<String>) -> Self {
        FetchOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed { .. })
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            FetchOutcome::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

impl FetchOutcome<BTreeSet<String>> {
    /// `Data` unless the set is empty.
    pub fn from_constituents(tickers: BTreeSet<String>) -> Self {
        if tickers.is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Data(tickers)
        }
    }
}

impl FetchOutcome<Holdings> {
    /// `Data` unless there are no holdings.
    pub fn from_holdings(holdings: Holdings) -> Self {
        if holdings.is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Data(holdings)
        }
    }
}

/// What kind of entity a fetch failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Index,
    Fund,
}

/// A source that failed during a run, kept for the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    pub kind: EntityKind,
    /// Configured index or fund name
    pub name: String,
    /// Configured source key
    pub source: String,
    pub reason: String,
}
