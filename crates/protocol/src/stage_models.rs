//! Production stages and the derived per-stage status vector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::batch_models::BatchStatus;

/// One of the six fixed production steps, in line order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TS)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    Batching,
    FerryCart,
    Tilting,
    Cutting,
    Autoclave,
    Segregation,
}

impl Stage {
    /// All stages in the fixed line order.
    pub const ALL: [Stage; 6] = [
        Stage::Batching,
        Stage::FerryCart,
        Stage::Tilting,
        Stage::Cutting,
        Stage::Autoclave,
        Stage::Segregation,
    ];

    /// Zero-based position in [`Stage::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The stage that follows this one, or `None` after segregation.
    pub fn next(self) -> Option<Stage> {
        Stage::ALL.get(self.index() + 1).copied()
    }

    /// Wire name, as used in JSON and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Batching => "batching",
            Stage::FerryCart => "ferryCart",
            Stage::Tilting => "tilting",
            Stage::Cutting => "cutting",
            Stage::Autoclave => "autoclave",
            Stage::Segregation => "segregation",
        }
    }

    /// Human-readable name for listings.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Batching => "Batching",
            Stage::FerryCart => "Ferry Cart",
            Stage::Tilting => "Tilting",
            Stage::Cutting => "Cutting",
            Stage::Autoclave => "Autoclave",
            Stage::Segregation => "Segregation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    /// Case-insensitive; `ferry-cart`, `ferry_cart` and `ferryCart` are all
    /// accepted, as is `tiltingCrane` for the tilting stage.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "batching" => Ok(Stage::Batching),
            "ferrycart" | "ferrycarts" => Ok(Stage::FerryCart),
            "tilting" | "tiltingcrane" => Ok(Stage::Tilting),
            "cutting" => Ok(Stage::Cutting),
            "autoclave" => Ok(Stage::Autoclave),
            "segregation" => Ok(Stage::Segregation),
            _ => Err(format!("unknown stage '{s}'")),
        }
    }
}

/// Derived status of a single stage.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "kebab-case")]
pub enum StageStatus {
    Completed,
    InProgress,
    Pending,
}

impl StageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StageStatus::Completed => "completed",
            StageStatus::InProgress => "in-progress",
            StageStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "completed" => Ok(StageStatus::Completed),
            "in-progress" => Ok(StageStatus::InProgress),
            "pending" => Ok(StageStatus::Pending),
            other => Err(format!(
                "unknown stage status '{other}' (expected completed, in-progress or pending)"
            )),
        }
    }
}

/// The six-entry derived status vector of a batch.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct BatchStages {
    pub batching: StageStatus,
    pub ferry_cart: StageStatus,
    pub tilting: StageStatus,
    pub cutting: StageStatus,
    pub autoclave: StageStatus,
    pub segregation: StageStatus,
}

impl BatchStages {
    /// Every stage set to `status`.
    pub fn all(status: StageStatus) -> Self {
        Self {
            batching: status,
            ferry_cart: status,
            tilting: status,
            cutting: status,
            autoclave: status,
            segregation: status,
        }
    }

    pub fn get(&self, stage: Stage) -> StageStatus {
        match stage {
            Stage::Batching => self.batching,
            Stage::FerryCart => self.ferry_cart,
            Stage::Tilting => self.tilting,
            Stage::Cutting => self.cutting,
            Stage::Autoclave => self.autoclave,
            Stage::Segregation => self.segregation,
        }
    }

    pub fn set(&mut self, stage: Stage, status: StageStatus) {
        let slot = match stage {
            Stage::Batching => &mut self.batching,
            Stage::FerryCart => &mut self.ferry_cart,
            Stage::Tilting => &mut self.tilting,
            Stage::Cutting => &mut self.cutting,
            Stage::Autoclave => &mut self.autoclave,
            Stage::Segregation => &mut self.segregation,
        };
        *slot = status;
    }

    /// `(stage, status)` pairs in line order.
    pub fn iter(&self) -> impl Iterator<Item = (Stage, StageStatus)> + '_ {
        Stage::ALL.iter().map(move |&stage| (stage, self.get(stage)))
    }

    /// The first stage, in line order, that is not completed.
    pub fn first_incomplete(&self) -> Option<Stage> {
        self.iter()
            .find(|(_, status)| *status != StageStatus::Completed)
            .map(|(stage, _)| stage)
    }

    /// The statuses as an array in line order.
    pub fn to_array(&self) -> [StageStatus; 6] {
        Stage::ALL.map(|stage| self.get(stage))
    }
}

impl Default for BatchStages {
    fn default() -> Self {
        Self::all(StageStatus::Pending)
    }
}

/// Compact listing view of a batch with its derived stages.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Document identifier (`_id` of the record).
    pub id: String,
    pub batch_number: String,
    pub mould_number: String,
    pub created_at: DateTime<Utc>,
    /// Slug form of the overall status (`in-progress`, …).
    pub status: String,
    pub stages: BatchStages,
}

impl BatchSummary {
    pub fn overall_status(&self) -> Option<BatchStatus> {
        self.status.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order_and_next() {
        assert_eq!(Stage::Batching.next(), Some(Stage::FerryCart));
        assert_eq!(Stage::Cutting.next(), Some(Stage::Autoclave));
        assert_eq!(Stage::Segregation.next(), None);
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
    }

    #[test]
    fn test_stage_parsing_accepts_common_spellings() {
        assert_eq!("ferry-cart".parse::<Stage>(), Ok(Stage::FerryCart));
        assert_eq!("ferryCarts".parse::<Stage>(), Ok(Stage::FerryCart));
        assert_eq!("TiltingCrane".parse::<Stage>(), Ok(Stage::Tilting));
        assert!("curing".parse::<Stage>().is_err());
    }

    #[test]
    fn test_first_incomplete() {
        let mut stages = BatchStages::all(StageStatus::Completed);
        assert_eq!(stages.first_incomplete(), None);

        stages.set(Stage::Autoclave, StageStatus::Pending);
        stages.set(Stage::Segregation, StageStatus::Pending);
        assert_eq!(stages.first_incomplete(), Some(Stage::Autoclave));
    }

    #[test]
    fn test_stage_status_wire_names() {
        let json = serde_json::to_string(&StageStatus::InProgress).expect("serialize");
        assert_eq!(json, "\"in-progress\"");
        assert_eq!("In Progress".parse::<StageStatus>(), Ok(StageStatus::InProgress));
    }
}
