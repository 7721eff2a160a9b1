//! Error types for the store, user input and catalog import

use std::path::PathBuf;

use thiserror::Error;

use crate::models::ComponentKind;

/// Failures reading reference data from a component store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: ComponentKind, id: String },

    #[error("invalid specs for component '{id}': {reason}")]
    InvalidSpecs { id: String, reason: String },

    #[error("{operation} timed out after {elapsed_ms}ms")]
    Timeout { operation: String, elapsed_ms: u128 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("store worker for {operation} failed: {reason}")]
    Worker { operation: String, reason: String },

    #[error("database connection lock poisoned")]
    LockPoisoned,
}

/// Invalid values in a user-supplied build
#[derive(Debug, Error, PartialEq)]
pub enum BuildDataError {
    #[error("invalid RAM '{0}', expected ddrN-GB (e.g. ddr4-16)")]
    InvalidRam(String),

    #[error("invalid PSU wattage '{0}'")]
    InvalidPsu(String),

    #[error("unknown resolution '{0}', expected 1080p, 1440p or 4k")]
    UnknownResolution(String),

    #[error("unknown storage type '{0}', expected nvme, sata-ssd or hdd")]
    UnknownStorage(String),

    #[error("unknown component kind '{0}'")]
    UnknownComponentKind(String),

    #[error("budget must be a non-negative amount, got {0}")]
    InvalidBudget(f64),
}

/// Problems loading catalog files
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("component '{id}' has invalid {kind} specs: {reason}")]
    InvalidComponent {
        id: String,
        kind: ComponentKind,
        reason: String,
    },

    #[error("game '{0}' has weights outside [0.5, 1.5]")]
    InvalidWeights(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
