//! In-memory store of batches and autoclave runs.
//!
//! `BatchStore` is a plain owned value with no interior locking; share it
//! through [`StateManager`](crate::state::manager::StateManager) when several
//! tasks need it.

use crate::batch::reports::{apply_report, prepare_autoclave_run};
use crate::stages::{autoclave_for_batch, resolve_stages, status_after_stage_update, summarize};
use crate::state::error::{StoreError, StoreResult};
use aac_protocol::autoclave_models::AutoclaveRecord;
use aac_protocol::batch_models::{BatchAutoclaveRef, BatchRecord, BatchStatus};
use aac_protocol::report_models::StageReport;
use aac_protocol::stage_models::{BatchStages, BatchSummary, Stage, StageStatus};
use chrono::{DateTime, SecondsFormat, Utc};

/// Batches and autoclave runs, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct BatchStore {
    batches: Vec<BatchRecord>,
    autoclaves: Vec<AutoclaveRecord>,
}

impl BatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from previously saved records.
    ///
    /// # Errors
    ///
    /// Fails on the first duplicate `batchId` or `autoclaveId`.
    pub fn from_records(
        batches: Vec<BatchRecord>,
        autoclaves: Vec<AutoclaveRecord>,
    ) -> StoreResult<Self> {
        let mut store = Self::new();
        for batch in batches {
            store.add_batch(batch)?;
        }
        for run in autoclaves {
            store.add_autoclave(run)?;
        }
        Ok(store)
    }

    pub fn batches(&self) -> &[BatchRecord] {
        &self.batches
    }

    pub fn autoclaves(&self) -> &[AutoclaveRecord] {
        &self.autoclaves
    }

    /// Adds a batch.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateBatch` if the `batchId` is taken.
    pub fn add_batch(&mut self, batch: BatchRecord) -> StoreResult<()> {
        if self.batch(&batch.batch_id).is_some() {
            tracing::warn!(batch_id = %batch.batch_id, "rejected duplicate batch");
            return Err(StoreError::DuplicateBatch(batch.batch_id));
        }
        tracing::debug!(batch_id = %batch.batch_id, mould_id = %batch.mould_id, "batch added");
        self.batches.push(batch);
        Ok(())
    }

    /// Adds an autoclave run as-is.
    ///
    /// This only stores the run; use [`record_autoclave_run`](Self::record_autoclave_run)
    /// to also advance the batches it processed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DuplicateAutoclave` if the `autoclaveId` is taken.
    pub fn add_autoclave(&mut self, run: AutoclaveRecord) -> StoreResult<()> {
        if self.autoclave(run.autoclave_id).is_some() {
            tracing::warn!(autoclave_id = run.autoclave_id, "rejected duplicate autoclave run");
            return Err(StoreError::DuplicateAutoclave(run.autoclave_id));
        }
        tracing::debug!(
            autoclave_id = run.autoclave_id,
            batches = run.batches_processed.len(),
            "autoclave run added"
        );
        self.autoclaves.push(run);
        Ok(())
    }

    /// Puts back an earlier version of a batch, or drops the batch when
    /// there was none.
    pub(crate) fn restore_batch(&mut self, batch_id: &str, previous: Option<BatchRecord>) {
        match previous {
            Some(previous) => match self.batch_mut(batch_id) {
                Some(current) => *current = previous,
                None => self.batches.push(previous),
            },
            None => self.batches.retain(|batch| batch.batch_id != batch_id),
        }
        tracing::debug!(batch_id, "batch restored");
    }

    pub(crate) fn remove_autoclave(&mut self, autoclave_id: u32) {
        self.autoclaves.retain(|run| run.autoclave_id != autoclave_id);
    }

    /// Looks up a batch by its `batchId`.
    pub fn batch(&self, batch_id: &str) -> Option<&BatchRecord> {
        self.batches.iter().find(|batch| batch.batch_id == batch_id)
    }

    fn batch_mut(&mut self, batch_id: &str) -> Option<&mut BatchRecord> {
        self.batches.iter_mut().find(|batch| batch.batch_id == batch_id)
    }

    /// Looks up an autoclave run by its number.
    pub fn autoclave(&self, autoclave_id: u32) -> Option<&AutoclaveRecord> {
        self.autoclaves
            .iter()
            .find(|run| run.autoclave_id == autoclave_id)
    }

    /// The first autoclave run that processed `batch_id`.
    pub fn autoclave_for_batch(&self, batch_id: &str) -> Option<&AutoclaveRecord> {
        autoclave_for_batch(batch_id, &self.autoclaves)
    }

    /// Overwrites the overall status of a batch.
    ///
    /// Returns `false` if the batch is unknown.
    pub fn update_batch_status(&mut self, batch_id: &str, status: BatchStatus) -> bool {
        match self.batch_mut(batch_id) {
            Some(batch) => {
                batch.status = status;
                tracing::debug!(batch_id, %status, "batch status updated");
                true
            }
            None => false,
        }
    }

    /// Moves `stage` of a batch to `status`.
    ///
    /// Only the overall status can change: completing segregation completes
    /// the batch, and starting any stage puts it in progress. Stage data is
    /// untouched. Returns `false`, changing nothing, if the batch is unknown.
    pub fn update_batch_stage(&mut self, batch_id: &str, stage: Stage, status: StageStatus) -> bool {
        let Some(batch) = self.batch_mut(batch_id) else {
            tracing::warn!(batch_id, %stage, "stage update for unknown batch ignored");
            return false;
        };
        if let Some(overall) = status_after_stage_update(stage, status) {
            batch.status = overall;
        }
        tracing::debug!(batch_id, %stage, %status, overall = %batch.status, "stage updated");
        true
    }

    /// Records an operator report for one stage of a batch.
    ///
    /// Writes the stage data, marks the stage completed and starts the next
    /// one. Returns the stage that was recorded.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::BatchNotFound` if the batch is unknown.
    pub fn record_stage(
        &mut self,
        batch_id: &str,
        report: StageReport,
        now: DateTime<Utc>,
    ) -> StoreResult<Stage> {
        let stage = report.stage();
        let batch = self
            .batch_mut(batch_id)
            .ok_or_else(|| StoreError::BatchNotFound(batch_id.to_string()))?;

        apply_report(batch, report, now);
        self.update_batch_stage(batch_id, stage, StageStatus::Completed);
        if let Some(next) = stage.next() {
            self.update_batch_stage(batch_id, next, StageStatus::InProgress);
        }
        Ok(stage)
    }

    /// Records an autoclave run and advances every batch it processed.
    ///
    /// The run gets a document ID and computed phase durations where missing.
    /// Each listed batch that is stored receives an autoclave reference, has
    /// its autoclave stage completed and its segregation stage started.
    /// Listed IDs that are not stored are skipped. Returns the IDs of the
    /// batches that were updated.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::EmptyAutoclaveRun` when no batches are listed and
    /// `StoreError::DuplicateAutoclave` when the number is taken. Nothing is
    /// changed in either case.
    pub fn record_autoclave_run(
        &mut self,
        mut run: AutoclaveRecord,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<String>> {
        if run.batches_processed.is_empty() {
            tracing::warn!(autoclave_id = run.autoclave_id, "rejected autoclave run without batches");
            return Err(StoreError::EmptyAutoclaveRun(run.autoclave_id));
        }
        prepare_autoclave_run(&mut run, now);

        let reference = BatchAutoclaveRef {
            autoclave_number: run.autoclave_id.to_string(),
            shift: run.shift.clone(),
            processed_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            door_open_time: run.door_open_time.clone(),
        };
        let batch_ids = run.batches_processed.clone();
        self.add_autoclave(run)?;

        let mut updated = Vec::new();
        for batch_id in batch_ids {
            let Some(batch) = self.batch_mut(&batch_id) else {
                tracing::warn!(batch_id = %batch_id, "autoclave run lists unknown batch");
                continue;
            };
            batch.process_steps.autoclave = Some(reference.clone());
            batch.metadata.updated_at = now;

            self.update_batch_stage(&batch_id, Stage::Autoclave, StageStatus::Completed);
            self.update_batch_stage(&batch_id, Stage::Segregation, StageStatus::InProgress);
            updated.push(batch_id);
        }
        Ok(updated)
    }

    /// Batches whose overall status is `status`.
    pub fn batches_by_status(&self, status: BatchStatus) -> Vec<&BatchRecord> {
        self.batches
            .iter()
            .filter(|batch| batch.status == status)
            .collect()
    }

    /// Batches whose derived status for `stage` is `status`.
    pub fn batches_by_stage(&self, stage: Stage, status: StageStatus) -> Vec<&BatchRecord> {
        self.batches
            .iter()
            .filter(|batch| resolve_stages(batch, &self.autoclaves).get(stage) == status)
            .collect()
    }

    /// Derived stages of a batch, or `None` if it is unknown.
    pub fn stages_for(&self, batch_id: &str) -> Option<BatchStages> {
        self.batch(batch_id)
            .map(|batch| resolve_stages(batch, &self.autoclaves))
    }

    /// Listing view of a single batch.
    pub fn summary(&self, batch_id: &str) -> Option<BatchSummary> {
        self.batch(batch_id)
            .map(|batch| summarize(batch, &self.autoclaves))
    }

    /// Listing views of all batches, in insertion order.
    pub fn summaries(&self) -> Vec<BatchSummary> {
        self.batches
            .iter()
            .map(|batch| summarize(batch, &self.autoclaves))
            .collect()
    }
}
