//! Snapshot module - persisted portfolio state and its stores.

mod file_store;
mod memory_store;
mod snapshot_model;
mod snapshot_traits;

pub use file_store::*;
pub use memory_store::*;
pub use snapshot_model::*;
pub use snapshot_traits::*;
