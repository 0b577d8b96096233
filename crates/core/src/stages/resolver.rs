//! Derivation of the six-stage status vector from a batch record.
//!
//! Stage completion is never stored on a batch. It is inferred from which
//! sub-records carry data, plus membership in an autoclave run, using an
//! ordered rule table. A matching rule marks its own stage and every earlier
//! stage completed, so missing intermediate data does not leave gaps.

use aac_protocol::autoclave_models::AutoclaveRecord;
use aac_protocol::batch_models::{BatchRecord, BatchStatus};
use aac_protocol::stage_models::{BatchStages, BatchSummary, Stage, StageStatus};

/// Evidence that a stage has been completed.
type CompletionCheck = fn(&BatchRecord, &[AutoclaveRecord]) -> bool;

/// Completion rules in line order.
///
/// Segregation completion re-marks autoclave completed even when no autoclave
/// run lists the batch.
const COMPLETION_RULES: [(Stage, CompletionCheck); 6] = [
    (Stage::Batching, batching_recorded),
    (Stage::FerryCart, ferry_cart_recorded),
    (Stage::Tilting, tilting_recorded),
    (Stage::Cutting, cutting_recorded),
    (Stage::Autoclave, autoclave_recorded),
    (Stage::Segregation, segregation_recorded),
];

fn batching_recorded(batch: &BatchRecord, _: &[AutoclaveRecord]) -> bool {
    !batch.process_steps.batching.process.discharge_time.is_empty()
}

fn ferry_cart_recorded(batch: &BatchRecord, _: &[AutoclaveRecord]) -> bool {
    !batch.process_steps.ferry_carts.measurements.time.is_empty()
}

fn tilting_recorded(batch: &BatchRecord, _: &[AutoclaveRecord]) -> bool {
    !batch.process_steps.tilting_crane.measurements.time.is_empty()
}

fn cutting_recorded(batch: &BatchRecord, _: &[AutoclaveRecord]) -> bool {
    !batch.process_steps.cutting.cutting_time.is_empty()
}

fn autoclave_recorded(batch: &BatchRecord, autoclaves: &[AutoclaveRecord]) -> bool {
    autoclave_processed(&batch.batch_id, autoclaves)
}

fn segregation_recorded(batch: &BatchRecord, _: &[AutoclaveRecord]) -> bool {
    batch.process_steps.segregation.total_blocks > 0
}

/// Whether any autoclave run lists `batch_id`.
pub fn autoclave_processed(batch_id: &str, autoclaves: &[AutoclaveRecord]) -> bool {
    autoclave_for_batch(batch_id, autoclaves).is_some()
}

/// The first autoclave run that lists `batch_id`.
pub fn autoclave_for_batch<'a>(
    batch_id: &str,
    autoclaves: &'a [AutoclaveRecord],
) -> Option<&'a AutoclaveRecord> {
    autoclaves.iter().find(|run| run.processes(batch_id))
}

/// Derives the per-stage status vector of `batch`.
///
/// 1. A `Pending` batch has every stage pending.
/// 2. Each completion rule that matches marks its stage and all earlier
///    stages completed.
/// 3. The first stage left incomplete becomes in progress.
/// 4. A `Completed` batch has every stage completed, whatever its data says.
///
/// This never fails; unusable field values were already coerced to empty or
/// zero when the record was read.
pub fn resolve_stages(batch: &BatchRecord, autoclaves: &[AutoclaveRecord]) -> BatchStages {
    if batch.status == BatchStatus::Pending {
        return BatchStages::all(StageStatus::Pending);
    }

    let mut stages = BatchStages::all(StageStatus::Pending);
    for (stage, recorded) in COMPLETION_RULES {
        if recorded(batch, autoclaves) {
            for earlier in &Stage::ALL[..=stage.index()] {
                stages.set(*earlier, StageStatus::Completed);
            }
        }
    }

    if let Some(current) = stages.first_incomplete() {
        stages.set(current, StageStatus::InProgress);
    }

    if batch.status == BatchStatus::Completed {
        return BatchStages::all(StageStatus::Completed);
    }

    stages
}

/// Listing view of `batch` with its derived stages.
pub fn summarize(batch: &BatchRecord, autoclaves: &[AutoclaveRecord]) -> BatchSummary {
    BatchSummary {
        id: batch.id.clone(),
        batch_number: batch.batch_id.clone(),
        mould_number: batch.mould_id.clone(),
        created_at: batch.metadata.created_at,
        status: batch.status.as_slug().to_string(),
        stages: resolve_stages(batch, autoclaves),
    }
}
