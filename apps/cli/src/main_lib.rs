use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use holdwatch_core::changes::{FundChanges, IndexChanges};
use holdwatch_core::enrichment::{NoOpTickerResolver, TickerNameResolver};
use holdwatch_core::fetch::SourceFailure;
use holdwatch_core::monitor::NotificationStatus;
use holdwatch_core::notify::{NoOpNotifier, Notifier};
use holdwatch_core::{load_config, JsonFileSnapshotStore, MonitorConfig, PortfolioMonitor, RunSummary};
use holdwatch_enrichment::{AnthropicTickerResolver, ResolverConfig};
use holdwatch_notify::{EmailCredentials, SmtpNotifier};
use holdwatch_sources::{DisclosureInbox, ImapInbox, SourceRegistry};

use crate::config::{AppConfig, OutputFormat};

/// Logs go to stderr so stdout carries only the report.
pub fn init_tracing() {
    let log_format = std::env::var("HOLDWATCH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Wire the monitor from the loaded configuration and the process credentials.
///
/// The registry is returned alongside so its fetch diagnostics can be read
/// after the run.
pub fn build_monitor(
    app: &AppConfig,
    config: Arc<MonitorConfig>,
) -> (PortfolioMonitor, Arc<SourceRegistry>) {
    let secrets = &app.secrets;

    let inbox = secrets.email_login().map(|(sender, password)| {
        Arc::new(ImapInbox::new(
            config.inbox.imap_server.clone(),
            sender,
            password,
            config.inbox.days_back,
        )) as Arc<dyn DisclosureInbox>
    });
    let source = Arc::new(SourceRegistry::new(&config, inbox));

    let resolver: Arc<dyn TickerNameResolver> = match &secrets.anthropic_api_key {
        Some(key) => {
            let resolver_config = ResolverConfig {
                model: secrets
                    .anthropic_model
                    .clone()
                    .unwrap_or_else(|| config.enrichment.model.clone()),
                max_tokens: config.enrichment.max_tokens,
            };
            Arc::new(AnthropicTickerResolver::new(Some(key.clone()), resolver_config))
        }
        None => {
            info!("ANTHROPIC_API_KEY not set, report lists tickers only");
            Arc::new(NoOpTickerResolver)
        }
    };

    let notifier: Arc<dyn Notifier> = if app.no_email {
        Arc::new(NoOpNotifier)
    } else {
        let credentials = EmailCredentials::from_parts(
            secrets.email_sender.as_deref(),
            secrets.email_password.as_deref(),
            secrets.email_recipient.as_deref(),
        );
        if credentials.is_none() {
            warn!("EMAIL_SENDER or EMAIL_PASSWORD not set, report will not be emailed");
        }
        Arc::new(SmtpNotifier::new(config.email.clone(), credentials))
    };

    let store = Arc::new(JsonFileSnapshotStore::new(&app.state_path));

    let monitor = PortfolioMonitor::new(config, source.clone(), store, resolver, notifier);
    (monitor, source)
}

/// Load the configuration and execute one run dated `run_date`.
pub async fn run(app: &AppConfig, run_date: NaiveDate) -> anyhow::Result<RunSummary> {
    let config = load_config(&app.config_path)
        .with_context(|| format!("Failed to load {}", app.config_path.display()))?;
    let (monitor, registry) = build_monitor(app, Arc::new(config));

    let summary = monitor.run(run_date).await.with_context(|| {
        format!("Monitor run failed (snapshot {})", app.state_path.display())
    })?;

    info!("Fetch diagnostics: {}", registry.diagnostics().summary());
    info!(
        "Run complete: {} failure(s), changes: {}",
        summary.failures.len(),
        summary.has_changes()
    );
    Ok(summary)
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    run_date: NaiveDate,
    has_changes: bool,
    index_changes: &'a IndexChanges,
    fund_changes: &'a FundChanges,
    failures: &'a [SourceFailure],
    notification: &'a NotificationStatus,
}

/// Text prints the report body; JSON prints the change sets.
pub fn render(summary: &RunSummary, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        // The body already opens with the subject line.
        OutputFormat::Text => Ok(summary.report.body.clone()),
        OutputFormat::Json => {
            let output = JsonOutput {
                run_date: summary.run_date,
                has_changes: summary.has_changes(),
                index_changes: &summary.index_changes,
                fund_changes: &summary.fund_changes,
                failures: &summary.failures,
                notification: &summary.notification,
            };
            serde_json::to_string_pretty(&output).context("Failed to serialise run summary")
        }
    }
}
