//! Email delivery of change reports.

mod smtp_notifier;

pub use smtp_notifier::*;
