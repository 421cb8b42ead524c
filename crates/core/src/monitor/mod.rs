//! Run orchestration: load, fetch, diff, save, report, notify.

mod monitor_model;
mod monitor_service;

pub use monitor_model::*;
pub use monitor_service::*;
