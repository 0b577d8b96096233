//! State manager coordinating the batch store, its storage and observers.
//!
//! The StateManager is the single writer for production records. It owns the
//! [`BatchStore`] behind an async mutex, writes every changed record through
//! to the configured [`SnapshotBackend`], and publishes an [`Event`] per
//! mutation.
//!
//! A change that cannot be written is undone in memory before the error is
//! returned, so readers never see records the backend refused. The store is
//! not locked during the write; a concurrent writer touching the same batch
//! in that window may be rolled back along with it. An autoclave run whose
//! write fails partway can leave the files written before the failure on
//! disk.

use crate::batch::builder::new_batch;
use crate::state::persistence::SnapshotBackend;
use crate::state::store::BatchStore;
use aac_protocol::autoclave_models::AutoclaveRecord;
use aac_protocol::batch_models::{BatchRecord, BatchStatus};
use aac_protocol::ipc::Event;
use aac_protocol::report_models::StageReport;
use aac_protocol::stage_models::{Stage, StageStatus};
use anyhow::Result;
use chrono::{Local, Utc};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Manages the production records of one plant.
///
/// The StateManager provides a centralized interface for:
/// - Creating batches and recording stage reports
/// - Recording autoclave runs
/// - Moving stages and overall batch status
/// - Read access for queries and the HTTP API
#[derive(Clone)]
pub struct StateManager {
    /// The records, shared with readers such as the HTTP API.
    store: Arc<Mutex<BatchStore>>,

    /// Where changed records are written, if anywhere.
    backend: Option<Arc<dyn SnapshotBackend>>,

    /// Channel for sending events to observers.
    events_tx: mpsc::Sender<Event>,
}

impl StateManager {
    /// Create a StateManager over an in-memory store.
    ///
    /// # Arguments
    ///
    /// * `store` - Initial records
    /// * `events_tx` - Channel for sending events to observers
    pub fn new(store: BatchStore, events_tx: mpsc::Sender<Event>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            backend: None,
            events_tx,
        }
    }

    /// Create a StateManager whose records are read from and written to `backend`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored records cannot be loaded.
    pub async fn load(
        backend: Arc<dyn SnapshotBackend>,
        events_tx: mpsc::Sender<Event>,
    ) -> Result<Self> {
        let store = backend.load().await?;
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            backend: Some(backend),
            events_tx,
        })
    }

    /// Runs `f` against the current records.
    ///
    /// The store is locked for the duration of `f`; keep it short.
    pub async fn read<R>(&self, f: impl FnOnce(&BatchStore) -> R) -> R {
        let store = self.store.lock().await;
        f(&store)
    }

    /// A copy of the current records.
    pub async fn snapshot(&self) -> BatchStore {
        self.store.lock().await.clone()
    }

    /// Create a batch stamped with the local time and add it.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch number is taken or the record cannot be
    /// written.
    pub async fn create_batch(&self, batch_number: &str, mould_number: &str) -> Result<BatchRecord> {
        let batch = new_batch(batch_number, mould_number, Local::now());
        self.add_batch(batch.clone()).await?;
        Ok(batch)
    }

    /// Add a prepared batch record.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch number is taken or the record cannot be
    /// written.
    pub async fn add_batch(&self, batch: BatchRecord) -> Result<()> {
        self.store.lock().await.add_batch(batch.clone())?;
        self.persist_or_restore(&batch, None).await?;

        let _ = self
            .events_tx
            .send(Event::BatchAdded {
                batch_id: batch.batch_id,
                mould_id: batch.mould_id,
            })
            .await;
        Ok(())
    }

    /// Move `stage` of a batch to `status`.
    ///
    /// Returns `false` if the batch is unknown, in which case nothing is
    /// written and no event is sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the changed record cannot be written.
    pub async fn update_batch_stage(
        &self,
        batch_id: &str,
        stage: Stage,
        stage_status: StageStatus,
    ) -> Result<bool> {
        let changed = {
            let mut store = self.store.lock().await;
            let previous = store.batch(batch_id).cloned();
            if store.update_batch_stage(batch_id, stage, stage_status) {
                store.batch(batch_id).cloned().map(|batch| (batch, previous))
            } else {
                None
            }
        };
        let Some((batch, previous)) = changed else {
            return Ok(false);
        };

        self.persist_or_restore(&batch, previous).await?;
        let _ = self
            .events_tx
            .send(Event::BatchStatusUpdate {
                batch_id: batch.batch_id,
                stage,
                stage_status,
                status: batch.status,
            })
            .await;
        Ok(true)
    }

    /// Overwrite the overall status of a batch.
    ///
    /// Returns `false` if the batch is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the changed record cannot be written.
    pub async fn update_batch_status(&self, batch_id: &str, status: BatchStatus) -> Result<bool> {
        let changed = {
            let mut store = self.store.lock().await;
            let previous = store.batch(batch_id).cloned();
            if store.update_batch_status(batch_id, status) {
                store.batch(batch_id).cloned().map(|batch| (batch, previous))
            } else {
                None
            }
        };
        match changed {
            Some((batch, previous)) => {
                self.persist_or_restore(&batch, previous).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Record an operator report for one stage of a batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is unknown or the record cannot be
    /// written.
    pub async fn record_stage(&self, batch_id: &str, report: StageReport) -> Result<Stage> {
        let (stage, batch, previous) = {
            let mut store = self.store.lock().await;
            let previous = store.batch(batch_id).cloned();
            let stage = store.record_stage(batch_id, report, Utc::now())?;
            (stage, store.batch(batch_id).cloned(), previous)
        };
        if let Some(batch) = &batch {
            self.persist_or_restore(batch, previous).await?;
        }

        tracing::info!(batch_id, %stage, "stage recorded");
        let _ = self
            .events_tx
            .send(Event::StageRecorded {
                batch_id: batch_id.to_string(),
                stage,
            })
            .await;
        Ok(stage)
    }

    /// Record an autoclave run and advance the batches it processed.
    ///
    /// Returns the IDs of the batches that were updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the run lists no batches, its number is taken, or
    /// a changed record cannot be written.
    pub async fn record_autoclave_run(&self, run: AutoclaveRecord) -> Result<Vec<String>> {
        let autoclave_id = run.autoclave_id;
        let (stored_run, batches, previous) = {
            let mut store = self.store.lock().await;
            let previous: Vec<BatchRecord> = run
                .batches_processed
                .iter()
                .filter_map(|id| store.batch(id).cloned())
                .collect();
            let updated = store.record_autoclave_run(run, Utc::now())?;
            let batches: Vec<BatchRecord> = updated
                .iter()
                .filter_map(|id| store.batch(id).cloned())
                .collect();
            (store.autoclave(autoclave_id).cloned(), batches, previous)
        };

        if let Err(err) = self.persist_run(stored_run.as_ref(), &batches).await {
            let mut store = self.store.lock().await;
            store.remove_autoclave(autoclave_id);
            for batch in previous {
                let batch_id = batch.batch_id.clone();
                store.restore_batch(&batch_id, Some(batch));
            }
            tracing::warn!(autoclave_id, error = %err, "autoclave run not written, rolled back");
            return Err(err);
        }

        let updated: Vec<String> = batches.into_iter().map(|b| b.batch_id).collect();
        tracing::info!(autoclave_id, batches = updated.len(), "autoclave run recorded");
        let _ = self
            .events_tx
            .send(Event::AutoclaveAdded {
                autoclave_id,
                batches: updated.clone(),
            })
            .await;
        Ok(updated)
    }

    /// Write every record to the backend.
    ///
    /// Does nothing but report the counts when no backend is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if any record cannot be written.
    pub async fn save(&self) -> Result<()> {
        let store = self.snapshot().await;
        if let Some(backend) = &self.backend {
            for batch in store.batches() {
                backend.save_batch(batch).await?;
            }
            for run in store.autoclaves() {
                backend.save_autoclave(run).await?;
            }
        }

        let _ = self
            .events_tx
            .send(Event::StoreSaved {
                batches: store.batches().len(),
                autoclaves: store.autoclaves().len(),
            })
            .await;
        Ok(())
    }

    /// Writes `batch`, undoing the in-memory change if the write fails.
    ///
    /// `previous` is the version before the change, `None` for a new batch.
    async fn persist_or_restore(
        &self,
        batch: &BatchRecord,
        previous: Option<BatchRecord>,
    ) -> Result<()> {
        if let Err(err) = self.persist_batch(batch).await {
            self.store
                .lock()
                .await
                .restore_batch(&batch.batch_id, previous);
            tracing::warn!(batch_id = %batch.batch_id, error = %err, "batch not written, rolled back");
            return Err(err);
        }
        Ok(())
    }

    async fn persist_run(&self, run: Option<&AutoclaveRecord>, batches: &[BatchRecord]) -> Result<()> {
        if let (Some(backend), Some(run)) = (&self.backend, run) {
            backend.save_autoclave(run).await?;
        }
        for batch in batches {
            self.persist_batch(batch).await?;
        }
        Ok(())
    }

    async fn persist_batch(&self, batch: &BatchRecord) -> Result<()> {
        if let Some(backend) = &self.backend {
            backend.save_batch(batch).await?;
        }
        Ok(())
    }
}
