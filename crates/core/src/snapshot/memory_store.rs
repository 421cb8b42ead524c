use std::sync::{Mutex, MutexGuard};

use log::warn;

use super::{PortfolioState, SnapshotStore};
use crate::errors::Result;

/// Snapshot store kept in process memory. Useful for dry runs and tests.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    state: Mutex<Option<PortfolioState>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `state` already stored.
    pub fn with_state(state: PortfolioState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
        }
    }

    /// The last saved state, if any.
    pub fn stored(&self) -> Option<PortfolioState> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<PortfolioState>> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("In-memory snapshot mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<PortfolioState> {
        Ok(self.lock().clone().unwrap_or_default())
    }

    fn save(&self, state: &PortfolioState) -> Result<()> {
        *self.lock() = Some(state.clone());
        Ok(())
    }
}
