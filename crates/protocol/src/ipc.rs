//! Store change feed.
//!
//! The core's state manager publishes an [`Event`] for every mutation so that
//! front-ends (the CLI's server log, a dashboard socket) can react without
//! polling the store.
//!
//! Communication is asynchronous and channel-based; a slow consumer never
//! blocks a writer for longer than the channel's buffer allows.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::batch_models::BatchStatus;
use crate::stage_models::{Stage, StageStatus};

/// Events sent from the core store to its observers.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "batchStatusUpdate",
///   "payload": {
///     "batch_id": "1520",
///     "stage": "cutting",
///     "stage_status": "completed",
///     "status": "In Progress"
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A new batch has been created.
    BatchAdded { batch_id: String, mould_id: String },

    /// A stage of a batch was moved to a new status.
    ///
    /// `status` is the overall batch status after the update.
    BatchStatusUpdate {
        batch_id: String,
        stage: Stage,
        stage_status: StageStatus,
        status: BatchStatus,
    },

    /// Operator data for a stage was written onto a batch.
    StageRecorded { batch_id: String, stage: Stage },

    /// An autoclave run was recorded.
    AutoclaveAdded {
        autoclave_id: u32,
        batches: Vec<String>,
    },

    /// The store was written to disk.
    StoreSaved { batches: usize, autoclaves: usize },
}
