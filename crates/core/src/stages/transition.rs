//! Overall status changes caused by moving a stage.

use aac_protocol::batch_models::BatchStatus;
use aac_protocol::stage_models::{Stage, StageStatus};

/// The overall batch status implied by setting `stage` to `status`.
///
/// Completing segregation finishes the batch; starting any stage puts the
/// batch in progress. Every other update leaves the overall status alone and
/// yields `None`.
///
/// Only the coarse status is touched here. The stage's own data is written
/// separately when an operator report is applied, and the resolver combines
/// both.
pub fn status_after_stage_update(stage: Stage, status: StageStatus) -> Option<BatchStatus> {
    match (stage, status) {
        (Stage::Segregation, StageStatus::Completed) => Some(BatchStatus::Completed),
        (_, StageStatus::InProgress) => Some(BatchStatus::InProgress),
        _ => None,
    }
}
