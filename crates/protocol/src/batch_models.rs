//! Batch record models.
//!
//! A [`BatchRecord`] tracks one mould of AAC through the six production
//! stages. The field layout mirrors the persisted document shape so records
//! exported from the plant database load without conversion.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::lenient;

/// Coarse overall status of a batch.
///
/// This flag is written independently of the per-stage sub-records and can
/// disagree with them; the derived per-stage vector is authoritative for
/// display except where this flag forces a uniform result.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
pub enum BatchStatus {
    /// Created but not yet started on the line.
    Pending,

    /// At least one stage has been started.
    #[serde(rename = "In Progress")]
    InProgress,

    /// Segregation has been recorded; the batch is finished.
    Completed,
}

impl BatchStatus {
    /// The lowercase, hyphenated form used by list screens
    /// (`pending`, `in-progress`, `completed`).
    pub fn as_slug(&self) -> &'static str {
        match self {
            BatchStatus::Pending => "pending",
            BatchStatus::InProgress => "in-progress",
            BatchStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BatchStatus::Pending => "Pending",
            BatchStatus::InProgress => "In Progress",
            BatchStatus::Completed => "Completed",
        };
        f.write_str(label)
    }
}

impl FromStr for BatchStatus {
    type Err = String;

    /// Accepts both the stored form (`In Progress`) and the slug form
    /// (`in-progress`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "pending" => Ok(BatchStatus::Pending),
            "in-progress" => Ok(BatchStatus::InProgress),
            "completed" => Ok(BatchStatus::Completed),
            other => Err(format!(
                "unknown batch status '{other}' (expected pending, in-progress or completed)"
            )),
        }
    }
}

/// Raw material quantities charged into the mixer.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchMaterials {
    /// Kilograms.
    #[serde(deserialize_with = "lenient::number")]
    pub fresh_slurry: f64,
    /// Kilograms.
    #[serde(deserialize_with = "lenient::number")]
    pub waste_slurry: f64,
    /// Kilograms.
    #[serde(deserialize_with = "lenient::number")]
    pub cement: f64,
    /// Kilograms.
    #[serde(deserialize_with = "lenient::number")]
    pub lime: f64,
    /// Kilograms.
    #[serde(deserialize_with = "lenient::number")]
    pub gypsum: f64,
    /// Grams.
    #[serde(deserialize_with = "lenient::number")]
    pub aluminum_powder: f64,
    /// Grams.
    #[serde(deserialize_with = "lenient::number")]
    pub dc_powder: f64,
    /// Kilograms.
    #[serde(deserialize_with = "lenient::number")]
    pub water: f64,
    /// Litres.
    #[serde(deserialize_with = "lenient::number")]
    pub solution_oil: f64,
}

/// Mixer process parameters.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchProcess {
    /// Mixing time in decimal hours.
    #[serde(deserialize_with = "lenient::number")]
    pub mixing_time: f64,

    /// Discharge clock time (`HH:MM`). Empty until the batching stage is done.
    #[serde(deserialize_with = "lenient::clock")]
    pub discharge_time: String,

    /// Slurry temperature at discharge, °C.
    #[serde(deserialize_with = "lenient::number")]
    pub discharge_temp: f64,
}

/// Stage 1: batching.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchingStep {
    pub shift: String,
    pub materials: BatchMaterials,
    pub process: BatchProcess,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct FerryCartMeasurements {
    #[serde(deserialize_with = "lenient::number")]
    pub flow: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub temp: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub height: f64,
    /// Measurement clock time. Empty until the stage is done.
    #[serde(deserialize_with = "lenient::clock")]
    pub time: String,
}

/// Stage 2: ferry cart.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct FerryCartStep {
    pub shift: String,
    pub measurements: FerryCartMeasurements,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct TiltingCraneMeasurements {
    pub rising_quality: String,
    #[serde(deserialize_with = "lenient::number")]
    pub temp: f64,
    /// Tilt clock time. Empty until the stage is done.
    #[serde(deserialize_with = "lenient::clock")]
    pub time: String,
    #[serde(deserialize_with = "lenient::number")]
    pub hardness: f64,
}

/// Stage 3: tilting crane.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct TiltingCraneStep {
    pub shift: String,
    pub measurements: TiltingCraneMeasurements,
}

/// A cutting-stage counter: usually a count, sometimes a free-text note
/// such as `"Yes"` or `"N/A"` carried over from paper reports.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(untagged)]
pub enum CuttingMark {
    Count(f64),
    Flag(bool),
    Note(String),
}

impl CuttingMark {
    /// Whether this mark records an actual rejection.
    ///
    /// Zero, `false`, the empty string, `"No"` and `"N/A"` mean nothing was
    /// rejected.
    pub fn is_rejection(&self) -> bool {
        match self {
            CuttingMark::Count(n) => *n != 0.0,
            CuttingMark::Flag(b) => *b,
            CuttingMark::Note(s) => !matches!(s.as_str(), "" | "No" | "N/A"),
        }
    }
}

/// Stage 4: wire cutting, with the per-cause rejection counters.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct CuttingData {
    /// Cutting clock time. Empty until the stage is done.
    #[serde(deserialize_with = "lenient::clock")]
    pub cutting_time: String,
    pub block_size: String,
    pub tilting_crane_rejection: Option<CuttingMark>,
    pub chipping_rejection: Option<CuttingMark>,
    pub side_cutter_rejection: Option<CuttingMark>,
    pub joined_rejection: Option<CuttingMark>,
    pub trimming_rejection: Option<CuttingMark>,
    #[serde(rename = "wireBrokenHC")]
    pub wire_broken_hc: Option<CuttingMark>,
    #[serde(rename = "wireBrokenVC")]
    pub wire_broken_vc: Option<CuttingMark>,
    #[serde(rename = "rejectedDueToHC")]
    pub rejected_due_to_hc: Option<CuttingMark>,
    #[serde(rename = "rejectedDueToVC")]
    pub rejected_due_to_vc: Option<CuttingMark>,
    pub dimension_check: Option<CuttingMark>,
}

/// Reference written onto each batch cured in an autoclave run.
///
/// The run itself lives in a separate
/// [`AutoclaveRecord`](crate::autoclave_models::AutoclaveRecord); stage
/// derivation consults the run list, not this reference.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchAutoclaveRef {
    #[serde(deserialize_with = "lenient::text")]
    pub autoclave_number: String,
    pub shift: String,
    pub processed_at: String,
    pub door_open_time: String,
}

/// Defects counted at one segregation position.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct DefectData {
    #[serde(deserialize_with = "lenient::count")]
    pub rain_cracks_cuts: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub corner_cracks_cuts: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub corner_damage: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub chipped_blocks: u32,
}

impl DefectData {
    pub fn total(&self) -> u32 {
        [
            self.rain_cracks_cuts,
            self.corner_cracks_cuts,
            self.corner_damage,
            self.chipped_blocks,
        ]
        .into_iter()
        .fold(0u32, u32::saturating_add)
    }
}

/// Stage 6: segregation of finished blocks.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct SegregationData {
    pub shift: String,

    /// Blocks produced. Zero until the stage is done.
    #[serde(deserialize_with = "lenient::count")]
    pub total_blocks: u32,

    pub size: String,

    /// Defect counts keyed by position (`"1"` … `"6"`).
    pub defects: BTreeMap<String, DefectData>,

    #[serde(deserialize_with = "lenient::count")]
    pub total_defects: u32,
}

/// Per-stage sub-records of a batch.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchProcessSteps {
    pub batching: BatchingStep,
    pub ferry_carts: FerryCartStep,
    pub tilting_crane: TiltingCraneStep,
    pub cutting: CuttingData,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub autoclave: Option<BatchAutoclaveRef>,
    pub segregation: SegregationData,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct BatchMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
}

/// One production unit tracked end-to-end through the six stages.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecord {
    /// Document identifier, `batch_<number>_<YYYYMMDD>`.
    #[serde(rename = "_id")]
    pub id: String,

    /// Operator-facing batch number. Unique within a store.
    #[serde(deserialize_with = "lenient::text")]
    pub batch_id: String,

    #[serde(deserialize_with = "lenient::text")]
    pub mould_id: String,

    pub status: BatchStatus,

    /// Production date.
    pub date: NaiveDate,

    #[serde(default)]
    pub process_steps: BatchProcessSteps,

    pub metadata: BatchMetadata,
}
