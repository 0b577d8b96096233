//! Operator stage reports.
//!
//! Each variant of [`StageReport`] carries what one operator form collects
//! for a stage. Reports are applied to a [`BatchRecord`](crate::BatchRecord)
//! by the core store, which also advances the stage bookkeeping.
//!
//! ```yaml
//! stage: ferryCart
//! shift: Day
//! measurements:
//!   flow: 210
//!   temp: 46
//!   height: 58
//!   time: "10:15"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::batch_models::{
    BatchAutoclaveRef, BatchMaterials, CuttingData, DefectData, FerryCartStep, TiltingCraneStep,
};
use crate::lenient;
use crate::stage_models::Stage;

/// Mixing time as entered on the batching form.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, TS)]
#[serde(default)]
pub struct MixingTime {
    #[serde(deserialize_with = "lenient::count")]
    pub hours: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub minutes: u32,
}

impl MixingTime {
    /// Decimal hours, e.g. 1h 30m is `1.5`.
    pub fn as_hours(&self) -> f64 {
        f64::from(self.hours) + f64::from(self.minutes) / 60.0
    }
}

/// Batching form.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchingReport {
    /// Keeps the shift assigned at creation when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub shift: Option<String>,
    pub materials: BatchMaterials,
    pub mixing_time: MixingTime,
    #[serde(deserialize_with = "lenient::clock")]
    pub discharge_time: String,
    #[serde(deserialize_with = "lenient::number")]
    pub discharge_temp: f64,
}

/// Segregation form.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct SegregationReport {
    pub shift: String,
    #[serde(deserialize_with = "lenient::count")]
    pub total_blocks: u32,
    pub size: String,
    /// Defect counts keyed by position (`"1"` … `"6"`).
    pub defects: BTreeMap<String, DefectData>,
}

/// What an operator submits for one stage of one batch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(tag = "stage", rename_all = "camelCase")]
pub enum StageReport {
    Batching(BatchingReport),
    FerryCart(FerryCartStep),
    Tilting(TiltingCraneStep),
    Cutting(CuttingData),
    Autoclave(BatchAutoclaveRef),
    Segregation(SegregationReport),
}

impl StageReport {
    /// The stage this report completes.
    pub fn stage(&self) -> Stage {
        match self {
            StageReport::Batching(_) => Stage::Batching,
            StageReport::FerryCart(_) => Stage::FerryCart,
            StageReport::Tilting(_) => Stage::Tilting,
            StageReport::Cutting(_) => Stage::Cutting,
            StageReport::Autoclave(_) => Stage::Autoclave,
            StageReport::Segregation(_) => Stage::Segregation,
        }
    }
}
