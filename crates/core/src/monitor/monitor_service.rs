use std::sync::Arc;

use chrono::NaiveDate;
use log::{error, info, warn};

use super::{NotificationStatus, RunSummary};
use crate::changes::{diff_indexes, FundChangeDetector, FundChangeReport, FundChanges};
use crate::config::MonitorConfig;
use crate::enrichment::TickerNameResolver;
use crate::errors::{NotifyError, Result};
use crate::fetch::{EntityKind, HoldingsSource, SourceFailure};
use crate::notify::Notifier;
use crate::report::{Report, ReportFormatter};
use crate::snapshot::{FundRecord, Holdings, PortfolioState, SnapshotStore};

/// Runs one monitoring pass.
///
/// Fetches are awaited one after another; the source implementation paces
/// them. The snapshot store is read once before any fetch and written once
/// after diffing, so an interrupted run leaves the previous snapshot intact.
pub struct PortfolioMonitor {
    config: Arc<MonitorConfig>,
    source: Arc<dyn HoldingsSource>,
    store: Arc<dyn SnapshotStore>,
    notifier: Arc<dyn Notifier>,
    detector: FundChangeDetector,
    formatter: ReportFormatter,
}

impl PortfolioMonitor {
    pub fn new(
        config: Arc<MonitorConfig>,
        source: Arc<dyn HoldingsSource>,
        store: Arc<dyn SnapshotStore>,
        resolver: Arc<dyn TickerNameResolver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let detector = FundChangeDetector::new(config.thresholds.mf_percentage_change);
        let formatter = ReportFormatter::new(config.clone(), resolver);
        Self {
            config,
            source,
            store,
            notifier,
            detector,
            formatter,
        }
    }

    /// Execute a full run dated `run_date`.
    ///
    /// Only snapshot store failures end the run early. Source failures are
    /// recorded in the summary and notification failures are logged.
    pub async fn run(&self, run_date: NaiveDate) -> Result<RunSummary> {
        info!("Portfolio monitor run for {}", run_date);

        let previous = self.store.load()?;
        let (current, failures) = self.fetch_current(run_date).await;

        let index_changes = diff_indexes(&previous.indexes, &current.indexes);
        let fund_changes = self.diff_funds(&previous, &current);

        self.store.save(&current)?;
        info!("Current state saved");

        if index_changes.is_empty() && fund_changes.is_empty() {
            info!("No changes detected");
        } else {
            info!(
                "Changes detected: {} index(es), {} mutual fund(s)",
                index_changes.len(),
                fund_changes.len()
            );
        }
        if !failures.is_empty() {
            warn!("{} source(s) failed this run", failures.len());
        }

        let report = self
            .formatter
            .format(run_date, &index_changes, &fund_changes, &failures)
            .await;
        let notification = self.notify(&report).await;

        Ok(RunSummary {
            run_date,
            index_changes,
            fund_changes,
            failures,
            report,
            notification,
        })
    }

    async fn fetch_current(&self, run_date: NaiveDate) -> (PortfolioState, Vec<SourceFailure>) {
        let mut state = PortfolioState::new();
        let mut failures = Vec::new();

        for index in &self.config.indexes {
            info!("Fetching constituents for {}...", index.name);
            let outcome = self.source.fetch_index(index).await;
            if let Some(reason) = outcome.failure_reason() {
                error!("Error fetching {}: {}", index.name, reason);
                failures.push(SourceFailure {
                    kind: EntityKind::Index,
                    name: index.name.clone(),
                    source: index.source.source_key().to_string(),
                    reason: reason.to_string(),
                });
            }
            let tickers = outcome.into_fragment();
            info!("  {}: found {} constituents", index.name, tickers.len());
            state.indexes.insert(index.name.clone(), tickers);
        }

        for fund in self.config.mutual_funds.iter().filter(|fund| !fund.enabled) {
            info!("Skipping disabled fund: {}", fund.name);
        }

        for fund in self.config.enabled_funds() {
            info!("Fetching holdings for {}...", fund.name);
            let outcome = self.source.fetch_fund(fund).await;
            if let Some(reason) = outcome.failure_reason() {
                error!("Error fetching {}: {}", fund.name, reason);
                failures.push(SourceFailure {
                    kind: EntityKind::Fund,
                    name: fund.name.clone(),
                    source: fund.source.source_key().to_string(),
                    reason: reason.to_string(),
                });
            }
            let holdings = outcome.into_fragment();
            info!("  {}: found {} holdings", fund.name, holdings.len());
            state
                .mutual_funds
                .insert(fund.name.clone(), FundRecord::captured_on(run_date, holdings));
        }

        (state, failures)
    }

    /// Diff every fund in `current`; funds new since `previous` diff against
    /// an empty mapping.
    fn diff_funds(&self, previous: &PortfolioState, current: &PortfolioState) -> FundChanges {
        let empty = Holdings::new();
        current
            .mutual_funds
            .iter()
            .filter_map(|(fund_name, record)| {
                let prev_holdings = previous.fund_holdings(fund_name).unwrap_or(&empty);
                let changes = self.detector.detect_changes(prev_holdings, &record.holdings);
                self.detector.has_changes(&changes).then(|| {
                    (
                        fund_name.clone(),
                        FundChangeReport {
                            month: record.month.clone(),
                            changes,
                        },
                    )
                })
            })
            .collect()
    }

    async fn notify(&self, report: &Report) -> NotificationStatus {
        if !self.notifier.is_enabled() {
            info!("Email notification disabled");
            return NotificationStatus::Disabled;
        }
        match self.notifier.send(&report.subject, &report.body).await {
            Ok(()) => NotificationStatus::Sent,
            Err(NotifyError::MissingCredentials) => {
                warn!("Email credentials not configured, skipping notification");
                NotificationStatus::Skipped
            }
            Err(err) => {
                error!("Failed to send notification: {}", err);
                NotificationStatus::Failed(err.to_string())
            }
        }
    }
}
