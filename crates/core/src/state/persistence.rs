//! Snapshot persistence for the batch store.
//!
//! A [`SnapshotBackend`] loads the full set of records once at startup and
//! then receives every changed record. [`YamlDirectory`] keeps one YAML file
//! per record in the layout the config loader reads back.

use crate::config::loader::{load_records, AUTOCLAVES_DIR, BATCHES_DIR};
use crate::state::error::{StoreError, StoreResult};
use crate::state::store::BatchStore;
use aac_protocol::autoclave_models::AutoclaveRecord;
use aac_protocol::batch_models::BatchRecord;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Storage behind a [`BatchStore`].
#[async_trait]
pub trait SnapshotBackend: Send + Sync {
    /// Reads every stored record into a fresh store.
    async fn load(&self) -> StoreResult<BatchStore>;

    /// Writes one batch record, replacing any previous version.
    async fn save_batch(&self, batch: &BatchRecord) -> StoreResult<()>;

    /// Writes one autoclave run, replacing any previous version.
    async fn save_autoclave(&self, run: &AutoclaveRecord) -> StoreResult<()>;
}

/// One YAML file per record under a data directory.
///
/// ```text
/// <data_dir>/
/// ├── batches/<batchId>.yaml
/// └── autoclaves/<autoclaveId>.yaml
/// ```
#[derive(Debug, Clone)]
pub struct YamlDirectory {
    data_dir: PathBuf,
}

impl YamlDirectory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file holding `batch_id`.
    pub fn batch_path(&self, batch_id: &str) -> PathBuf {
        self.data_dir
            .join(BATCHES_DIR)
            .join(format!("{}.yaml", file_stem(batch_id)))
    }

    /// Path of the file holding autoclave run `autoclave_id`.
    pub fn autoclave_path(&self, autoclave_id: u32) -> PathBuf {
        self.data_dir
            .join(AUTOCLAVES_DIR)
            .join(format!("{autoclave_id}.yaml"))
    }

    async fn write_yaml<T: Serialize + Sync>(&self, path: PathBuf, record: &T) -> StoreResult<()> {
        let yaml = serde_yaml::to_string(record).map_err(|source| StoreError::Serialize {
            path: path.clone(),
            source,
        })?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&path, yaml)
            .await
            .map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "record written");
        Ok(())
    }
}

#[async_trait]
impl SnapshotBackend for YamlDirectory {
    async fn load(&self) -> StoreResult<BatchStore> {
        let (batches, autoclaves) = load_records(&self.data_dir)?;
        tracing::info!(
            data_dir = %self.data_dir.display(),
            batches = batches.len(),
            autoclaves = autoclaves.len(),
            "records loaded"
        );
        BatchStore::from_records(batches, autoclaves)
    }

    async fn save_batch(&self, batch: &BatchRecord) -> StoreResult<()> {
        self.write_yaml(self.batch_path(&batch.batch_id), batch).await
    }

    async fn save_autoclave(&self, run: &AutoclaveRecord) -> StoreResult<()> {
        self.write_yaml(self.autoclave_path(run.autoclave_id), run)
            .await
    }
}

/// Batch numbers are operator input, so any byte outside `[A-Za-z0-9_-]`
/// is written as `%XX`. Distinct IDs always map to distinct file names; the
/// empty ID becomes `%`.
fn file_stem(id: &str) -> String {
    if id.is_empty() {
        return "%".to_string();
    }
    let mut stem = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(char::from(byte));
        } else {
            let _ = write!(stem, "%{byte:02X}");
        }
    }
    stem
}
