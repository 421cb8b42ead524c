//! JSON file snapshot store.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::{PortfolioState, SnapshotStore};
use crate::errors::{Result, SnapshotError};

/// Stores the portfolio state as indented JSON so operators can inspect and
/// diff it by hand between runs.
#[derive(Debug, Clone)]
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_failed(&self, err: impl ToString) -> SnapshotError {
        SnapshotError::WriteFailed {
            path: self.path.clone(),
            message: err.to_string(),
        }
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn load(&self) -> Result<PortfolioState> {
        if !self.path.exists() {
            info!(
                "No previous snapshot at {}, starting from an empty state",
                self.path.display()
            );
            return Ok(PortfolioState::default());
        }

        let raw = fs::read(&self.path).map_err(|e| SnapshotError::ReadFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        if raw.is_empty() {
            return Ok(PortfolioState::default());
        }

        let state: PortfolioState =
            serde_json::from_slice(&raw).map_err(|e| SnapshotError::Corrupt {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        debug!(
            "Loaded snapshot with {} index(es) and {} fund(s)",
            state.indexes.len(),
            state.mutual_funds.len()
        );
        Ok(state)
    }

    fn save(&self, state: &PortfolioState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.write_failed(e))?;
            }
        }

        let json = serde_json::to_string_pretty(state)
            .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

        // Write beside the target, then rename over it.
        let temp_path = self.temp_path();
        fs::write(&temp_path, json).map_err(|e| self.write_failed(e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| self.write_failed(e))?;

        debug!("Snapshot saved to {}", self.path.display());
        Ok(())
    }
}
