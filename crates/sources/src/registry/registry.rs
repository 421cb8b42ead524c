//! Source registry: routes configured indexes and funds to their adapters.
//!
//! The registry is the only [`HoldingsSource`] in production. It spaces
//! fetches with a [`RequestPacer`], retries a transient failure once, records
//! every attempt in [`FetchDiagnostics`] and folds errors into
//! [`FetchOutcome::Failed`].

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use holdwatch_core::config::{FundConfig, IndexConfig, IndexSource, MonitorConfig};
use holdwatch_core::fetch::{EntityKind, FetchOutcome, HoldingsSource};
use holdwatch_core::snapshot::Holdings;
use log::{error, info, warn};

use super::diagnostics::{AttemptResult, FetchDiagnostics};
use super::pacer::RequestPacer;
use crate::errors::SourceError;
use crate::funds::DisclosureFetcher;
use crate::http::build_client;
use crate::inbox::DisclosureInbox;
use crate::index::{InvescoProvider, NasdaqProvider, NseProvider, VanguardProvider};

/// First try plus one retry.
const MAX_ATTEMPTS: u32 = 2;

/// Size of a fetched fragment, for logs and diagnostics.
trait FragmentLen {
    fn fragment_len(&self) -> usize;
}

impl FragmentLen for BTreeSet<String> {
    fn fragment_len(&self) -> usize {
        self.len()
    }
}

impl FragmentLen for Holdings {
    fn fragment_len(&self) -> usize {
        self.len()
    }
}

pub struct SourceRegistry {
    nse: NseProvider,
    nasdaq: NasdaqProvider,
    vanguard: VanguardProvider,
    invesco: InvescoProvider,
    disclosures: DisclosureFetcher,
    pacer: RequestPacer,
    diagnostics: Mutex<FetchDiagnostics>,
}

impl SourceRegistry {
    /// Build every adapter around one shared HTTP client. `inbox` enables the
    /// email lookup for AMCs that mail their disclosures.
    pub fn new(config: &MonitorConfig, inbox: Option<Arc<dyn DisclosureInbox>>) -> Self {
        let client = build_client(Duration::from_secs(config.fetch.request_timeout_secs));
        let nasdaq = NasdaqProvider::new(client.clone());

        Self {
            nse: NseProvider::new(client.clone()),
            invesco: InvescoProvider::new(nasdaq.clone()),
            nasdaq,
            vanguard: VanguardProvider::new(client.clone()),
            disclosures: DisclosureFetcher::new(
                client,
                inbox,
                config.thresholds.min_holding_to_report,
            ),
            pacer: RequestPacer::new(Duration::from_secs(config.fetch.request_delay_secs)),
            diagnostics: Mutex::new(FetchDiagnostics::new()),
        }
    }

    /// Attempts recorded so far in this run.
    pub fn diagnostics(&self) -> FetchDiagnostics {
        self.lock_diagnostics().clone()
    }

    fn lock_diagnostics(&self) -> MutexGuard<'_, FetchDiagnostics> {
        self.diagnostics.lock().unwrap_or_else(|poisoned| {
            warn!("Fetch diagnostics mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    async fn index_constituents(&self, source: &IndexSource) -> Result<BTreeSet<String>, SourceError> {
        match source {
            IndexSource::NseApi { index_name } => self.nse.fetch(index_name).await,
            IndexSource::NasdaqOfficial { index_symbol } => {
                self.nasdaq.fetch(index_symbol.as_deref()).await
            }
            IndexSource::VanguardEtf { ticker } => self.vanguard.fetch(ticker).await,
            IndexSource::InvescoEtf { ticker } => self.invesco.fetch(ticker).await,
        }
    }

    /// Run `fetch` after the pacing interval, retrying once when the error
    /// is transient.
    async fn fetch_with_retry<T, F, Fut>(
        &self,
        kind: EntityKind,
        name: &str,
        source_key: &'static str,
        fetch: F,
    ) -> Result<T, SourceError>
    where
        T: FragmentLen,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, SourceError>>,
    {
        let mut attempt = 1;
        loop {
            self.pacer.wait().await;
            tracing::debug!(source = source_key, attempt, "fetching {}", name);

            let result = fetch().await;
            let record = match &result {
                Ok(fragment) if fragment.fragment_len() == 0 => AttemptResult::Empty,
                Ok(fragment) => AttemptResult::Success {
                    count: fragment.fragment_len(),
                },
                Err(e) => AttemptResult::Error {
                    message: e.to_string(),
                    transient: e.is_transient(),
                },
            };
            self.lock_diagnostics()
                .record(kind, name, source_key, attempt, record);

            match result {
                Err(e) if e.is_transient() && attempt < MAX_ATTEMPTS => {
                    warn!("{} ({}): {}; retrying", name, source_key, e);
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[async_trait]
impl HoldingsSource for SourceRegistry {
    async fn fetch_index(&self, index: &IndexConfig) -> FetchOutcome<BTreeSet<String>> {
        let source_key = index.source.source_key();
        info!("Fetching index {} ({})", index.name, source_key);

        match self
            .fetch_with_retry(EntityKind::Index, &index.name, source_key, || {
                self.index_constituents(&index.source)
            })
            .await
        {
            Ok(tickers) => FetchOutcome::from_constituents(tickers),
            Err(e) => {
                error!("Index {} ({}) failed: {}", index.name, source_key, e);
                FetchOutcome::failed(e.to_string())
            }
        }
    }

    async fn fetch_fund(&self, fund: &FundConfig) -> FetchOutcome<Holdings> {
        let source_key = fund.source.source_key();
        info!("Fetching fund {} ({})", fund.name, source_key);

        match self
            .fetch_with_retry(EntityKind::Fund, &fund.name, source_key, || {
                self.disclosures.fetch(&fund.source)
            })
            .await
        {
            Ok(holdings) => FetchOutcome::from_holdings(holdings),
            Err(e) => {
                error!("Fund {} ({}) failed: {}", fund.name, source_key, e);
                FetchOutcome::failed(e.to_string())
            }
        }
    }
}
