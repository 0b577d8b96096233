//! Applying operator stage reports to batch records.

use crate::batch::time::time_difference;
use aac_protocol::autoclave_models::{AutoclavePhase, AutoclaveRecord};
use aac_protocol::batch_models::{
    BatchProcess, BatchRecord, BatchStatus, CuttingData, CuttingMark, DefectData, SegregationData,
};
use aac_protocol::report_models::StageReport;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;

/// Sum of every defect count across all segregation positions.
pub fn total_defects(defects: &BTreeMap<String, DefectData>) -> u32 {
    defects
        .values()
        .map(DefectData::total)
        .fold(0u32, u32::saturating_add)
}

/// Writes the data of `report` onto `batch` and bumps `updatedAt`.
///
/// Only the stage's sub-record changes, except for segregation, which also
/// finishes the batch. Stage bookkeeping (completing this stage and starting
/// the next) is the caller's job; see
/// [`BatchStore::record_stage`](crate::state::store::BatchStore::record_stage).
pub fn apply_report(batch: &mut BatchRecord, report: StageReport, now: DateTime<Utc>) {
    let steps = &mut batch.process_steps;
    match report {
        StageReport::Batching(report) => {
            if let Some(shift) = report.shift {
                steps.batching.shift = shift;
            }
            steps.batching.materials = report.materials;
            steps.batching.process = BatchProcess {
                mixing_time: report.mixing_time.as_hours(),
                discharge_time: report.discharge_time,
                discharge_temp: report.discharge_temp,
            };
        }
        StageReport::FerryCart(step) => steps.ferry_carts = step,
        StageReport::Tilting(step) => steps.tilting_crane = step,
        StageReport::Cutting(mut cutting) => {
            if cutting.block_size.is_empty() {
                cutting.block_size = std::mem::take(&mut steps.cutting.block_size);
            }
            zero_unreported_counters(&mut cutting);
            steps.cutting = cutting;
        }
        StageReport::Autoclave(mut reference) => {
            if reference.processed_at.is_empty() {
                reference.processed_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);
            }
            steps.autoclave = Some(reference);
        }
        StageReport::Segregation(report) => {
            steps.segregation = SegregationData {
                total_defects: total_defects(&report.defects),
                shift: report.shift,
                total_blocks: report.total_blocks,
                size: report.size,
                defects: report.defects,
            };
            batch.status = BatchStatus::Completed;
        }
    }
    batch.metadata.updated_at = now;
}

/// A submitted cutting form records zero for every counter left blank.
fn zero_unreported_counters(cutting: &mut CuttingData) {
    for counter in [
        &mut cutting.tilting_crane_rejection,
        &mut cutting.chipping_rejection,
        &mut cutting.side_cutter_rejection,
        &mut cutting.joined_rejection,
        &mut cutting.trimming_rejection,
        &mut cutting.wire_broken_hc,
        &mut cutting.wire_broken_vc,
        &mut cutting.rejected_due_to_hc,
        &mut cutting.rejected_due_to_vc,
        &mut cutting.dimension_check,
    ] {
        counter.get_or_insert(CuttingMark::Count(0.0));
    }
}

/// Completes a submitted autoclave run before it is stored.
///
/// Assigns `autoclave_<number>_<YYYYMMDD>` when no document ID was given and
/// computes every phase duration that was not recorded, as the time elapsed
/// since the preceding phase.
pub fn prepare_autoclave_run(run: &mut AutoclaveRecord, now: DateTime<Utc>) {
    if run.id.is_empty() {
        run.id = format!("autoclave_{}_{}", run.autoclave_id, now.format("%Y%m%d"));
    }

    let missing: Vec<(AutoclavePhase, String)> = run
        .phases()
        .iter()
        .filter(|reading| reading.duration.map_or(true, str::is_empty))
        .map(|reading| {
            let elapsed = time_difference(run.phase_start(reading.phase), reading.time);
            (reading.phase, elapsed)
        })
        .collect();

    for (phase, duration) in missing {
        run.set_duration(phase, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::builder::new_batch;
    use aac_protocol::batch_models::{FerryCartMeasurements, FerryCartStep};
    use aac_protocol::report_models::{BatchingReport, MixingTime, SegregationReport};
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 9, hour, minute, 0)
            .single()
            .expect("valid timestamp")
    }

    fn defects(counts: [u32; 4]) -> DefectData {
        DefectData {
            rain_cracks_cuts: counts[0],
            corner_cracks_cuts: counts[1],
            corner_damage: counts[2],
            chipped_blocks: counts[3],
        }
    }

    #[test]
    fn test_batching_report_converts_mixing_time() {
        let mut batch = new_batch("1520", "M4", at(8, 0));
        let report = StageReport::Batching(BatchingReport {
            mixing_time: MixingTime { hours: 0, minutes: 15 },
            discharge_time: "08:42".to_string(),
            discharge_temp: 47.0,
            ..Default::default()
        });

        apply_report(&mut batch, report, at(8, 45));

        let process = &batch.process_steps.batching.process;
        assert_eq!(process.mixing_time, 0.25);
        assert_eq!(process.discharge_time, "08:42");
        assert_eq!(batch.process_steps.batching.shift, "Day");
        assert_eq!(batch.metadata.updated_at, at(8, 45));
        assert_eq!(batch.metadata.created_at, at(8, 0));
    }

    #[test]
    fn test_ferry_cart_report_replaces_step() {
        let mut batch = new_batch("1520", "M4", at(8, 0));
        let step = FerryCartStep {
            shift: "Day".to_string(),
            measurements: FerryCartMeasurements {
                flow: 210.0,
                temp: 46.0,
                height: 58.0,
                time: "09:05".to_string(),
            },
        };

        apply_report(&mut batch, StageReport::FerryCart(step.clone()), at(9, 5));
        assert_eq!(batch.process_steps.ferry_carts, step);
        assert_eq!(batch.status, BatchStatus::InProgress);
    }

    #[test]
    fn test_cutting_report_zeroes_blank_counters() {
        let mut batch = new_batch("1520", "M4", at(8, 0));
        let cutting = CuttingData {
            cutting_time: "11:20".to_string(),
            chipping_rejection: Some(CuttingMark::Count(2.0)),
            ..Default::default()
        };

        apply_report(&mut batch, StageReport::Cutting(cutting), at(11, 20));

        let cutting = &batch.process_steps.cutting;
        assert_eq!(cutting.block_size, "600x200x100");
        assert_eq!(cutting.chipping_rejection, Some(CuttingMark::Count(2.0)));
        assert_eq!(cutting.trimming_rejection, Some(CuttingMark::Count(0.0)));
        assert_eq!(cutting.dimension_check, Some(CuttingMark::Count(0.0)));
    }

    #[test]
    fn test_segregation_report_completes_batch() {
        let mut batch = new_batch("1520", "M4", at(8, 0));
        let mut positions = BTreeMap::new();
        positions.insert("1".to_string(), defects([2, 0, 1, 0]));
        positions.insert("6".to_string(), defects([0, 3, 0, 4]));

        let report = StageReport::Segregation(SegregationReport {
            shift: "Night".to_string(),
            total_blocks: 252,
            size: "600x200x100".to_string(),
            defects: positions,
        });
        apply_report(&mut batch, report, at(20, 0));

        let segregation = &batch.process_steps.segregation;
        assert_eq!(batch.status, BatchStatus::Completed);
        assert_eq!(segregation.total_blocks, 252);
        assert_eq!(segregation.total_defects, 10);
        assert_eq!(segregation.shift, "Night");
    }

    #[test]
    fn test_total_defects_of_no_positions_is_zero() {
        assert_eq!(total_defects(&BTreeMap::new()), 0);
    }

    #[test]
    fn test_prepare_autoclave_run_fills_missing_durations() {
        let mut run = AutoclaveRecord {
            autoclave_id: 102,
            previous_door_open_time: "14:30".to_string(),
            door_close_time: "15:15".to_string(),
            vacuum_finish_time: "15:45".to_string(),
            slow_steam_start_time: "15:50".to_string(),
            fast_steam_start_time: "16:55".to_string(),
            max_pressure_time: "18:25".to_string(),
            release_start_time: "00:05".to_string(),
            door_open_time: "01:20".to_string(),
            max_pressure_duration: Some("recorded".to_string()),
            ..Default::default()
        };

        prepare_autoclave_run(&mut run, at(2, 0));

        assert_eq!(run.id, "autoclave_102_20250409");
        assert_eq!(run.door_close_duration.as_deref(), Some("0h 45m"));
        assert_eq!(run.vacuum_finish_duration.as_deref(), Some("0h 30m"));
        assert_eq!(run.slow_steam_duration.as_deref(), Some("0h 5m"));
        assert_eq!(run.fast_steam_duration.as_deref(), Some("1h 5m"));
        assert_eq!(run.max_pressure_duration.as_deref(), Some("recorded"));
        assert_eq!(run.release_start_duration.as_deref(), Some("5h 40m"));
        assert_eq!(run.door_open_duration.as_deref(), Some("1h 15m"));
    }
}
