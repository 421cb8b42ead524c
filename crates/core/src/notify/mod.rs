//! Notification sink for the change report.

use async_trait::async_trait;
use log::debug;

use crate::errors::NotifyError;

/// Delivers a rendered report.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// False for sinks that never deliver anything.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Send one message. Errors are reported to the caller, which decides
    /// whether they matter.
    async fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// Notifier that drops every message. Used with `--no-email`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn send(&self, subject: &str, _body: &str) -> Result<(), NotifyError> {
        debug!("Notification disabled, not sending '{}'", subject);
        Ok(())
    }
}
