//! Change-set value types produced by the detectors.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Constituent changes for one index.
///
/// Both lists are in ascending lexicographic order. A change set is only ever
/// produced when at least one of them is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexChangeSet {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl IndexChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Index name → constituent changes. Unchanged indexes are absent.
pub type IndexChanges = BTreeMap<String, IndexChangeSet>;

/// A ticker the fund did not hold before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Addition {
    pub ticker: String,
    pub pct: Decimal,
}

/// A ticker the fund no longer holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exit {
    pub ticker: String,
    pub old_pct: Decimal,
}

/// A held ticker whose weight moved by at least the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rebalance {
    pub ticker: String,
    pub old_pct: Decimal,
    pub new_pct: Decimal,
    /// `new_pct - old_pct`
    pub delta: Decimal,
}

/// Holdings changes for one fund.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundChangeSet {
    pub additions: Vec<Addition>,
    pub exits: Vec<Exit>,
    pub increases: Vec<Rebalance>,
    pub decreases: Vec<Rebalance>,
}

impl FundChangeSet {
    /// True when any of the four lists has an entry.
    pub fn has_changes(&self) -> bool {
        !self.additions.is_empty()
            || !self.exits.is_empty()
            || !self.increases.is_empty()
            || !self.decreases.is_empty()
    }
}

/// A fund's change set together with the reporting month it was computed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundChangeReport {
    /// Reporting month of the current record, `YYYY-MM`
    pub month: String,
    pub changes: FundChangeSet,
}

/// Fund name → change report. Funds without changes are absent.
pub type FundChanges = BTreeMap<String, FundChangeReport>;
