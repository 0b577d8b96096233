//! Test fixtures for creating sample projects and production records.

use aac_core::batch::builder::new_batch;
use aac_protocol::autoclave_models::AutoclaveRecord;
use aac_protocol::batch_models::{
    BatchRecord, CuttingData, CuttingMark, FerryCartMeasurements, FerryCartStep,
    TiltingCraneMeasurements, TiltingCraneStep,
};
use aac_protocol::ipc::Event;
use aac_protocol::report_models::{BatchingReport, MixingTime, SegregationReport, StageReport};
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;
use tokio::sync::mpsc;

/// A batch record as the plant writes it after cutting.
#[allow(dead_code)]
pub const CUT_BATCH_YAML: &str = r#"_id: batch_1511_20250408
batchId: "1511"
mouldId: M2
status: In Progress
date: 2025-04-08
processSteps:
  batching:
    shift: Night
    process:
      mixingTime: 0.3
      dischargeTime: "22:10"
      dischargeTemp: 46
  ferryCarts:
    shift: Night
    measurements:
      time: "22:40"
  tiltingCrane:
    shift: Night
    measurements:
      time: "00:55"
  cutting:
    cuttingTime: "01:20"
    blockSize: 600x200x100
    chippingRejection: 2
    joinedRejection: "No"
    rejectedDueToVC: 1
metadata:
  createdAt: 2025-04-08T21:50:00Z
  updatedAt: 2025-04-09T01:20:00Z
  createdBy: app_user
"#;

/// Create a temporary project directory with an `.aac-neo` configuration.
///
/// This creates a complete test environment with:
/// - `.aac-neo/config.toml` naming the plant and data directory
/// - `.aac-neo/records/batches/1511.yaml`, a batch through cutting
/// - an empty `.aac-neo/records/autoclaves/` directory
///
/// Returns a TempDir that must be kept alive for the test duration.
#[allow(dead_code)]
pub fn create_test_project() -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let project = temp_dir.path().join(".aac-neo");

    std::fs::create_dir_all(project.join("records/batches"))?;
    std::fs::create_dir_all(project.join("records/autoclaves"))?;

    std::fs::write(
        project.join("config.toml"),
        "plant_name = \"Integration Plant\"\ndata_dir = \"records\"\n",
    )?;
    std::fs::write(project.join("records/batches/1511.yaml"), CUT_BATCH_YAML)?;

    Ok(temp_dir)
}

/// A fixed UTC timestamp on 2025-04-09.
#[allow(dead_code)]
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 9, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

/// A fresh batch created at 08:00 on 2025-04-09.
#[allow(dead_code)]
pub fn sample_batch(number: &str, mould: &str) -> BatchRecord {
    new_batch(number, mould, at(8, 0))
}

#[allow(dead_code)]
pub fn batching_report() -> StageReport {
    StageReport::Batching(BatchingReport {
        shift: None,
        mixing_time: MixingTime {
            hours: 0,
            minutes: 18,
        },
        discharge_time: "08:42".to_string(),
        discharge_temp: 47.0,
        ..Default::default()
    })
}

#[allow(dead_code)]
pub fn ferry_cart_report() -> StageReport {
    StageReport::FerryCart(FerryCartStep {
        shift: "Day".to_string(),
        measurements: FerryCartMeasurements {
            flow: 210.0,
            temp: 46.0,
            height: 58.0,
            time: "09:05".to_string(),
        },
    })
}

#[allow(dead_code)]
pub fn tilting_report() -> StageReport {
    StageReport::Tilting(TiltingCraneStep {
        shift: "Day".to_string(),
        measurements: TiltingCraneMeasurements {
            time: "10:55".to_string(),
            ..Default::default()
        },
    })
}

#[allow(dead_code)]
pub fn cutting_report(chipping: u32) -> StageReport {
    StageReport::Cutting(CuttingData {
        cutting_time: "11:20".to_string(),
        chipping_rejection: Some(CuttingMark::Count(f64::from(chipping))),
        ..Default::default()
    })
}

#[allow(dead_code)]
pub fn segregation_report(total_blocks: u32) -> StageReport {
    StageReport::Segregation(SegregationReport {
        shift: "Day".to_string(),
        total_blocks,
        size: "600x200x100".to_string(),
        ..Default::default()
    })
}

/// An autoclave run over `batches` with clock times but no durations.
#[allow(dead_code)]
pub fn sample_autoclave_run(autoclave_id: u32, batches: &[&str]) -> AutoclaveRecord {
    AutoclaveRecord {
        autoclave_id,
        shift: "Day".to_string(),
        batches_processed: batches.iter().map(|id| id.to_string()).collect(),
        previous_door_open_time: "02:38".to_string(),
        door_close_time: "03:23".to_string(),
        vacuum_finish_time: "03:52".to_string(),
        slow_steam_start_time: "03:58".to_string(),
        fast_steam_start_time: "05:03".to_string(),
        max_pressure_time: "06:39".to_string(),
        max_pressure: Some(11.5),
        release_start_time: "12:10".to_string(),
        door_open_time: "13:38".to_string(),
        ..Default::default()
    }
}

/// Drain every event currently buffered on `rx`.
#[allow(dead_code)]
pub fn drain_events(rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
