//! Storage trait for the persisted portfolio state.

use super::PortfolioState;
use crate::errors::Result;

/// Durable home of the previous run's [`PortfolioState`].
///
/// Single reader, single writer, same process. Implementations keep exactly
/// one generation; there is no history.
pub trait SnapshotStore: Send + Sync {
    /// Load the stored state.
    ///
    /// Returns an empty state when nothing has been stored yet. A document
    /// that exists but cannot be read or parsed is an error.
    fn load(&self) -> Result<PortfolioState>;

    /// Replace the stored state with `state` in full.
    fn save(&self, state: &PortfolioState) -> Result<()>;
}
