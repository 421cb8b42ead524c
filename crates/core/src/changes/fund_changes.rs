use rust_decimal::Decimal;

use super::{Addition, Exit, FundChangeSet, Rebalance};
use crate::constants::DEFAULT_MF_PERCENTAGE_CHANGE;
use crate::snapshot::Holdings;

/// Detects additions, exits and threshold-gated rebalances in fund holdings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FundChangeDetector {
    threshold: Decimal,
}

impl Default for FundChangeDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MF_PERCENTAGE_CHANGE)
    }
}

impl FundChangeDetector {
    /// `threshold` is in percentage points and must not be negative; the
    /// configuration loader rejects negative values before they get here.
    pub fn new(threshold: Decimal) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> Decimal {
        self.threshold
    }

    /// Compare two holdings mappings.
    ///
    /// A rebalance is reported when `|delta| >= threshold`. Positive deltas are
    /// increases; everything else that passes the gate (a zero delta when the
    /// threshold is zero included) is a decrease. Lists follow ticker order of
    /// the inputs; callers sort for display.
    pub fn detect_changes(&self, previous: &Holdings, current: &Holdings) -> FundChangeSet {
        let mut changes = FundChangeSet::default();

        for (ticker, &new_pct) in current {
            match previous.get(ticker) {
                None => changes.additions.push(Addition {
                    ticker: ticker.clone(),
                    pct: new_pct,
                }),
                Some(&old_pct) => {
                    let delta = new_pct - old_pct;
                    if delta.abs() < self.threshold {
                        continue;
                    }
                    let rebalance = Rebalance {
                        ticker: ticker.clone(),
                        old_pct,
                        new_pct,
                        delta,
                    };
                    if delta > Decimal::ZERO {
                        changes.increases.push(rebalance);
                    } else {
                        changes.decreases.push(rebalance);
                    }
                }
            }
        }

        for (ticker, &old_pct) in previous {
            if !current.contains_key(ticker) {
                changes.exits.push(Exit {
                    ticker: ticker.clone(),
                    old_pct,
                });
            }
        }

        changes
    }

    /// True when `change_set` has any entry at all.
    pub fn has_changes(&self, change_set: &FundChangeSet) -> bool {
        change_set.has_changes()
    }
}
