//! Core error types for holdwatch.
//!
//! Only two failure families are allowed to end a run: configuration loading
//! and the snapshot store. Everything else (source fetches, enrichment,
//! notification) is degraded locally by the component that owns it.

use std::path::PathBuf;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the monitor.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Snapshot store error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Errors raised while loading or validating the monitor configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("Failed to read configuration {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// The configuration file is not valid JSON or has the wrong shape.
    #[error("Malformed configuration {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    /// A `source` key that no adapter is registered for.
    #[error("Unknown source '{source_key}' for '{entity}'")]
    UnknownSource { entity: String, source_key: String },

    /// The `params` object does not match what the source kind expects.
    #[error("Invalid params for '{entity}' ({source_key}): {message}")]
    InvalidParams {
        entity: String,
        source_key: String,
        message: String,
    },

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Errors raised by the snapshot store.
///
/// A missing snapshot is not an error; see [`crate::snapshot::SnapshotStore::load`].
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The stored document exists but could not be read.
    #[error("Failed to read snapshot {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    /// The stored document exists but does not parse as a portfolio state.
    #[error("Snapshot {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// The new document could not be written or moved into place.
    #[error("Failed to write snapshot {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },

    #[error("Failed to serialize snapshot: {0}")]
    Serialization(String),
}

/// Errors raised by notification sinks.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Email credentials not configured")]
    MissingCredentials,

    #[error("Invalid address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    #[error("Failed to build message: {0}")]
    Message(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Transport error: {0}")]
    Transport(String),
}
