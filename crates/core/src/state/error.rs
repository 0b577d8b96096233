//! Error types for the batch store.

use crate::config::error::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while mutating or persisting the batch store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A batch with the same `batchId` is already stored.
    #[error("Batch {0} already exists")]
    DuplicateBatch(String),

    /// An autoclave run with the same `autoclaveId` is already stored.
    #[error("Autoclave {0} already exists")]
    DuplicateAutoclave(u32),

    /// No batch with this `batchId` is stored.
    #[error("Batch {0} not found")]
    BatchNotFound(String),

    /// An autoclave run was submitted without any batches.
    #[error("Autoclave {0} must process at least one batch")]
    EmptyAutoclaveRun(u32),

    /// Stored records could not be loaded.
    #[error("Failed to load records: {0}")]
    Load(#[from] ConfigError),

    /// A record could not be serialized.
    #[error("Failed to serialize record for {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// A record file could not be written.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Type alias for Result with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;
