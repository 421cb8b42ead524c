use std::collections::BTreeSet;

use async_trait::async_trait;

use super::FetchOutcome;
use crate::config::{FundConfig, IndexConfig};
use crate::snapshot::Holdings;

/// Produces snapshot fragments for configured indexes and funds.
///
/// Implementations never return an error: every failure is folded into
/// [`FetchOutcome::Failed`] so one source cannot abort the run. Pacing between
/// successive calls is the implementation's concern.
#[async_trait]
pub trait HoldingsSource: Send + Sync {
    /// Fetch the current constituent tickers of an index.
    async fn fetch_index(&self, index: &IndexConfig) -> FetchOutcome<BTreeSet<String>>;

    /// Fetch the current holdings of a fund, already filtered to the minimum
    /// reporting weight and expressed in percent.
    async fn fetch_fund(&self, fund: &FundConfig) -> FetchOutcome<Holdings>;
}
