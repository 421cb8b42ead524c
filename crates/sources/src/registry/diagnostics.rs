//! Per-run record of source fetch attempts.

use holdwatch_core::fetch::EntityKind;

/// How a single attempt ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptResult {
    Success { count: usize },
    Empty,
    Error { message: String, transient: bool },
}

/// One attempt at fetching an index or fund.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchAttempt {
    pub kind: EntityKind,
    pub name: String,
    pub source_key: &'static str,
    /// 1 for the first try, 2 for the retry.
    pub attempt: u32,
    pub result: AttemptResult,
}

#[derive(Clone, Debug, Default)]
pub struct FetchDiagnostics {
    pub attempts: Vec<FetchAttempt>,
}

impl FetchDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        kind: EntityKind,
        name: &str,
        source_key: &'static str,
        attempt: u32,
        result: AttemptResult,
    ) {
        self.attempts.push(FetchAttempt {
            kind,
            name: name.to_string(),
            source_key,
            attempt,
            result,
        });
    }

    /// Number of attempts that were retries.
    pub fn retries(&self) -> usize {
        self.attempts.iter().filter(|a| a.attempt > 1).count()
    }

    /// Error messages, in attempt order.
    pub fn errors(&self) -> Vec<(&str, &str)> {
        self.attempts
            .iter()
            .filter_map(|a| match &a.result {
                AttemptResult::Error { message, .. } => Some((a.name.as_str(), message.as_str())),
                _ => None,
            })
            .collect()
    }

    /// Summary for logging.
    pub fn summary(&self) -> String {
        self.attempts
            .iter()
            .map(|a| {
                let label = format!("{} [{}#{}]", a.name, a.source_key, a.attempt);
                match &a.result {
                    AttemptResult::Success { count } => format!("{label}: OK ({count})"),
                    AttemptResult::Empty => format!("{label}: EMPTY"),
                    AttemptResult::Error { message, transient } => {
                        let kind = if *transient { "TRANSIENT" } else { "ERROR" };
                        format!("{label}: {kind} ({message})")
                    }
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
