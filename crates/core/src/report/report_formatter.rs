use std::sync::Arc;

use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;

use super::Report;
use crate::changes::{FundChangeReport, FundChangeSet, FundChanges, IndexChangeSet, IndexChanges};
use crate::config::MonitorConfig;
use crate::constants::MONTH_FORMAT;
use crate::enrichment::{format_with_company_names, TickerNameResolver};
use crate::fetch::{EntityKind, SourceFailure};

const DIVIDER_WIDTH: usize = 60;

/// Renders change sets into the report sent to operators.
pub struct ReportFormatter {
    config: Arc<MonitorConfig>,
    resolver: Arc<dyn TickerNameResolver>,
}

impl ReportFormatter {
    pub fn new(config: Arc<MonitorConfig>, resolver: Arc<dyn TickerNameResolver>) -> Self {
        Self { config, resolver }
    }

    /// Build the subject and body for one run.
    pub async fn format(
        &self,
        run_date: NaiveDate,
        index_changes: &IndexChanges,
        fund_changes: &FundChanges,
        failures: &[SourceFailure],
    ) -> Report {
        let month_year = run_date.format(MONTH_FORMAT).to_string();
        let changed_funds: Vec<(&String, &FundChangeReport)> = fund_changes
            .iter()
            .filter(|(_, report)| report.changes.has_changes())
            .collect();
        let has_changes = !index_changes.is_empty() || !changed_funds.is_empty();

        let subject = if has_changes {
            format!("Portfolio Changes Detected - {month_year}")
        } else {
            format!("No Portfolio Changes - {month_year}")
        };

        let mut lines = vec![subject.clone(), String::new()];
        if has_changes {
            if !index_changes.is_empty() {
                push_heading(&mut lines, "INDEX CONSTITUENT CHANGES");
                for (index_name, change) in index_changes {
                    self.push_index_section(&mut lines, index_name, change)
                        .await;
                }
            }
            if !changed_funds.is_empty() {
                push_heading(&mut lines, "MUTUAL FUND HOLDINGS CHANGES");
                for (fund_name, report) in changed_funds {
                    push_fund_section(&mut lines, fund_name, &report.month, &report.changes);
                    lines.push(String::new());
                }
            }
            push_failures(&mut lines, failures);
            lines.push(divider());
        } else {
            self.push_unchanged_body(&mut lines);
            push_failures(&mut lines, failures);
        }

        Report {
            subject,
            body: lines.join("\n"),
            has_changes,
        }
    }

    async fn push_index_section(
        &self,
        lines: &mut Vec<String>,
        index_name: &str,
        change: &IndexChangeSet,
    ) {
        lines.push(index_name.to_string());
        lines.push("-".repeat(index_name.chars().count()));

        let names = if self.resolver.is_available() {
            info!("Resolving tickers for {}...", index_name);
            self.resolver
                .resolve(&diff_text(change), index_name)
                .await
        } else {
            Default::default()
        };

        if !change.added.is_empty() {
            lines.push(format!("Added ({}):", change.added.len()));
            for ticker in format_with_company_names(&change.added, &names) {
                lines.push(format!("  + {ticker}"));
            }
            lines.push(String::new());
        }
        if !change.removed.is_empty() {
            lines.push(format!("Removed ({}):", change.removed.len()));
            for ticker in format_with_company_names(&change.removed, &names) {
                lines.push(format!("  - {ticker}"));
            }
            lines.push(String::new());
        }
        lines.push(String::new());
    }

    fn push_unchanged_body(&self, lines: &mut Vec<String>) {
        lines.push(divider());
        lines.push(String::new());
        lines.push("All monitored indexes and mutual funds remain unchanged.".to_string());
        lines.push(String::new());

        if !self.config.indexes.is_empty() {
            lines.push("Monitored Indexes:".to_string());
            for index in &self.config.indexes {
                lines.push(format!("  - {}", index.name));
            }
            lines.push(String::new());
        }
        if !self.config.mutual_funds.is_empty() {
            lines.push("Monitored Mutual Funds:".to_string());
            for fund in &self.config.mutual_funds {
                lines.push(format!("  - {}", fund.name));
            }
            lines.push(String::new());
        }
    }
}

/// Change listing sent to the resolver, in the same shape as the report.
fn diff_text(change: &IndexChangeSet) -> String {
    let mut parts = Vec::new();
    if !change.added.is_empty() {
        parts.push(format!("Added ({}):", change.added.len()));
        parts.extend(change.added.iter().map(|t| format!("  + {t}")));
    }
    if !change.removed.is_empty() {
        parts.push(format!("Removed ({}):", change.removed.len()));
        parts.extend(change.removed.iter().map(|t| format!("  - {t}")));
    }
    parts.join("\n")
}

/// Render one fund's changes. Returns nothing when the set is empty.
pub fn format_fund_changes(fund_name: &str, month: &str, changes: &FundChangeSet) -> String {
    let mut lines = Vec::new();
    push_fund_section(&mut lines, fund_name, month, changes);
    lines.join("\n")
}

fn push_fund_section(lines: &mut Vec<String>, fund_name: &str, month: &str, changes: &FundChangeSet) {
    if !changes.has_changes() {
        return;
    }

    lines.push(fund_name.to_string());
    lines.push("-".repeat(fund_name.chars().count()));
    lines.push(format!("Period: {}", month_name(month)));
    lines.push(String::new());

    if !changes.additions.is_empty() {
        let mut additions: Vec<_> = changes.additions.iter().collect();
        additions.sort_by(|a, b| b.pct.cmp(&a.pct));
        lines.push(format!("NEW ADDITIONS ({}):", additions.len()));
        for addition in additions {
            lines.push(format!("  + {} ({}%)", addition.ticker, pct(addition.pct)));
        }
        lines.push(String::new());
    }

    if !changes.exits.is_empty() {
        let mut exits: Vec<_> = changes.exits.iter().collect();
        exits.sort_by(|a, b| b.old_pct.cmp(&a.old_pct));
        lines.push(format!("COMPLETE EXITS ({}):", exits.len()));
        for exit in exits {
            lines.push(format!("  - {} (was {}%)", exit.ticker, pct(exit.old_pct)));
        }
        lines.push(String::new());
    }

    if !changes.increases.is_empty() {
        let mut increases: Vec<_> = changes.increases.iter().collect();
        increases.sort_by(|a, b| b.delta.cmp(&a.delta));
        lines.push("SIGNIFICANT INCREASES:".to_string());
        for r in increases {
            lines.push(format!(
                "  {}: {}% -> {}% (+{}%)",
                r.ticker,
                pct(r.old_pct),
                pct(r.new_pct),
                pct(r.delta)
            ));
        }
        lines.push(String::new());
    }

    if !changes.decreases.is_empty() {
        let mut decreases: Vec<_> = changes.decreases.iter().collect();
        decreases.sort_by(|a, b| a.delta.cmp(&b.delta));
        lines.push("SIGNIFICANT DECREASES:".to_string());
        for r in decreases {
            lines.push(format!(
                "  {}: {}% -> {}% ({}%)",
                r.ticker,
                pct(r.old_pct),
                pct(r.new_pct),
                pct(r.delta)
            ));
        }
        lines.push(String::new());
    }
}

fn push_failures(lines: &mut Vec<String>, failures: &[SourceFailure]) {
    if failures.is_empty() {
        return;
    }

    push_heading(lines, "SOURCE ISSUES");
    lines.push("These sources could not be fetched; their entries were stored empty.".to_string());
    lines.push(String::new());
    for failure in failures {
        let kind = match failure.kind {
            EntityKind::Index => "index",
            EntityKind::Fund => "fund",
        };
        lines.push(format!(
            "  ! {} ({}, {}): {}",
            failure.name, kind, failure.source, failure.reason
        ));
    }
    lines.push(String::new());
}

fn push_heading(lines: &mut Vec<String>, title: &str) {
    lines.push(divider());
    lines.push(title.to_string());
    lines.push(divider());
    lines.push(String::new());
}

fn divider() -> String {
    "=".repeat(DIVIDER_WIDTH)
}

/// `2025-12` → `December 2025`. Unparseable months are shown as given.
fn month_name(month: &str) -> String {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map(|date| date.format("%B %Y").to_string())
        .unwrap_or_else(|_| month.to_string())
}

/// One-decimal rendering, `5` → `5.0`.
fn pct(value: Decimal) -> String {
    let mut rounded = value.round_dp(1);
    rounded.rescale(1);
    rounded.to_string()
}
