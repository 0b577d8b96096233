//! Custom assertion helpers for integration tests.

use aac_protocol::ipc::Event;
use aac_protocol::stage_models::{BatchStages, StageStatus};

/// Assert that `stages` reads, in line order, as `expected`.
///
/// Uses one letter per stage (`C`ompleted, `I`n progress, `P`ending) so a
/// failing assertion shows the whole vector at a glance.
#[allow(dead_code)]
pub fn assert_stages(stages: &BatchStages, expected: &str) {
    let actual: String = stages
        .to_array()
        .iter()
        .map(|status| match status {
            StageStatus::Completed => 'C',
            StageStatus::InProgress => 'I',
            StageStatus::Pending => 'P',
        })
        .collect();
    assert_eq!(actual, expected, "unexpected stage vector {:?}", stages);
}

/// Assert that a derived stage vector is well formed: completed stages, then
/// at most one in-progress stage, then pending stages.
#[allow(dead_code)]
pub fn assert_stage_vector_well_formed(stages: &BatchStages) {
    let statuses = stages.to_array();
    let rank = |s: &StageStatus| match s {
        StageStatus::Completed => 0,
        StageStatus::InProgress => 1,
        StageStatus::Pending => 2,
    };
    assert!(
        statuses.windows(2).all(|w| rank(&w[0]) <= rank(&w[1])),
        "stages out of order: {:?}",
        stages
    );
    let in_progress = statuses
        .iter()
        .filter(|s| **s == StageStatus::InProgress)
        .count();
    assert!(in_progress <= 1, "more than one stage in progress: {:?}", stages);
}

/// Whether `events` contains a StageRecorded event for `batch_id`.
#[allow(dead_code)]
pub fn has_stage_recorded(events: &[Event], batch_id: &str) -> bool {
    events.iter().any(|e| {
        matches!(
            e,
            Event::StageRecorded { batch_id: id, .. } if id == batch_id
        )
    })
}

/// Whether `events` contains an AutoclaveAdded event for run `autoclave_id`.
#[allow(dead_code)]
pub fn has_autoclave_added(events: &[Event], autoclave_id: u32) -> bool {
    events.iter().any(|e| {
        matches!(
            e,
            Event::AutoclaveAdded { autoclave_id: id, .. } if *id == autoclave_id
        )
    })
}
