//! Construction of new batch records.

use aac_protocol::batch_models::{
    BatchMetadata, BatchProcessSteps, BatchRecord, BatchStatus, BatchingStep, CuttingData,
    FerryCartStep, SegregationData, TiltingCraneStep,
};
use chrono::{DateTime, TimeZone, Timelike, Utc};

/// Creator recorded on batches created through this library.
pub const DEFAULT_CREATOR: &str = "app_user";

/// Block size assumed until the cutting stage records one.
pub const DEFAULT_BLOCK_SIZE: &str = "600x200x100";

/// Shift name for a wall-clock hour: `Day` from 06:00 to 17:59, `Night`
/// otherwise.
pub fn current_shift(hour: u32) -> &'static str {
    if (6..18).contains(&hour) {
        "Day"
    } else {
        "Night"
    }
}

/// Creates an in-progress batch with every stage at its defaults.
///
/// `now` is interpreted in its own time zone for the production date, the
/// identifier date and the shift; metadata timestamps are stored in UTC.
///
/// # Example
///
/// ```
/// use aac_core::batch::builder::new_batch;
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2025, 4, 9, 21, 5, 0).unwrap();
/// let batch = new_batch("1520", "M4", now);
/// assert_eq!(batch.id, "batch_1520_20250409");
/// assert_eq!(batch.process_steps.batching.shift, "Night");
/// ```
pub fn new_batch<Tz: TimeZone>(batch_number: &str, mould_number: &str, now: DateTime<Tz>) -> BatchRecord {
    let date = now.date_naive();
    let shift = current_shift(now.hour()).to_string();
    let timestamp = now.with_timezone(&Utc);

    BatchRecord {
        id: format!("batch_{}_{}", batch_number, date.format("%Y%m%d")),
        batch_id: batch_number.to_string(),
        mould_id: mould_number.to_string(),
        status: BatchStatus::InProgress,
        date,
        process_steps: default_process_steps(shift),
        metadata: BatchMetadata {
            created_at: timestamp,
            updated_at: timestamp,
            created_by: DEFAULT_CREATOR.to_string(),
        },
    }
}

fn default_process_steps(shift: String) -> BatchProcessSteps {
    BatchProcessSteps {
        batching: BatchingStep {
            shift: shift.clone(),
            ..Default::default()
        },
        ferry_carts: FerryCartStep {
            shift: shift.clone(),
            ..Default::default()
        },
        tilting_crane: TiltingCraneStep {
            shift,
            ..Default::default()
        },
        cutting: CuttingData {
            block_size: DEFAULT_BLOCK_SIZE.to_string(),
            ..Default::default()
        },
        autoclave: None,
        // Segregation records its own shift when the stage is reported
        segregation: SegregationData::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_current_shift_boundaries() {
        assert_eq!(current_shift(5), "Night");
        assert_eq!(current_shift(6), "Day");
        assert_eq!(current_shift(17), "Day");
        assert_eq!(current_shift(18), "Night");
        assert_eq!(current_shift(0), "Night");
    }

    #[test]
    fn test_new_batch_defaults() {
        let now = Utc
            .with_ymd_and_hms(2025, 4, 9, 8, 15, 0)
            .single()
            .expect("valid timestamp");
        let batch = new_batch("1520", "M4", now);

        assert_eq!(batch.id, "batch_1520_20250409");
        assert_eq!(batch.batch_id, "1520");
        assert_eq!(batch.mould_id, "M4");
        assert_eq!(batch.status, BatchStatus::InProgress);
        assert_eq!(batch.date.to_string(), "2025-04-09");
        assert_eq!(batch.metadata.created_by, "app_user");
        assert_eq!(batch.metadata.created_at, now);

        let steps = &batch.process_steps;
        assert_eq!(steps.batching.shift, "Day");
        assert_eq!(steps.ferry_carts.shift, "Day");
        assert_eq!(steps.tilting_crane.shift, "Day");
        assert_eq!(steps.segregation.shift, "");
        assert_eq!(steps.cutting.block_size, "600x200x100");
        assert!(steps.cutting.chipping_rejection.is_none());
        assert!(steps.autoclave.is_none());
        assert!(steps.batching.process.discharge_time.is_empty());
    }

    #[test]
    fn test_new_batch_uses_local_date_of_timestamp() {
        // 01:30 in UTC+3 is still the previous day in UTC
        let offset = FixedOffset::east_opt(3 * 3600).expect("valid offset");
        let now = offset
            .with_ymd_and_hms(2025, 4, 10, 1, 30, 0)
            .single()
            .expect("valid timestamp");
        let batch = new_batch("1530", "M1", now);

        assert_eq!(batch.id, "batch_1530_20250410");
        assert_eq!(batch.process_steps.batching.shift, "Night");
        assert_eq!(batch.metadata.created_at.to_rfc3339(), "2025-04-09T22:30:00+00:00");
    }
}
