//! Autoclave run models.
//!
//! One [`AutoclaveRecord`] describes a curing run that may cover several
//! batches at once. Readings are taken at seven sequential phases, each with a
//! clock time, a pressure in bar and the duration since the previous phase.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::lenient;

/// The seven sequential phases of an autoclave run.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "camelCase")]
pub enum AutoclavePhase {
    DoorClose,
    VacuumFinish,
    SlowSteamStart,
    FastSteamStart,
    MaxPressure,
    ReleaseStart,
    DoorOpen,
}

impl AutoclavePhase {
    pub const ALL: [AutoclavePhase; 7] = [
        AutoclavePhase::DoorClose,
        AutoclavePhase::VacuumFinish,
        AutoclavePhase::SlowSteamStart,
        AutoclavePhase::FastSteamStart,
        AutoclavePhase::MaxPressure,
        AutoclavePhase::ReleaseStart,
        AutoclavePhase::DoorOpen,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AutoclavePhase::DoorClose => "Door Close",
            AutoclavePhase::VacuumFinish => "Vacuum Finish",
            AutoclavePhase::SlowSteamStart => "Slow Steam Start",
            AutoclavePhase::FastSteamStart => "Fast Steam Start",
            AutoclavePhase::MaxPressure => "Max Pressure",
            AutoclavePhase::ReleaseStart => "Release Start",
            AutoclavePhase::DoorOpen => "Door Open",
        }
    }
}

impl fmt::Display for AutoclavePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single phase reading borrowed from an [`AutoclaveRecord`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseReading<'a> {
    pub phase: AutoclavePhase,
    pub time: &'a str,
    pub pressure: Option<f64>,
    pub duration: Option<&'a str>,
}

/// One autoclave curing run.
///
/// `batches_processed` is an explicit list of batch IDs. Older exports store
/// it as a comma-joined string; both forms are accepted on input and the list
/// form is always written.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct AutoclaveRecord {
    /// Document identifier, `autoclave_<number>_<YYYYMMDD>`. Assigned when
    /// the run is recorded if left empty.
    #[serde(rename = "_id", default)]
    pub id: String,

    /// Autoclave number. Unique within a store.
    pub autoclave_id: u32,

    #[serde(default)]
    pub shift: String,

    #[serde(default, deserialize_with = "lenient::id_list")]
    pub batches_processed: Vec<String>,

    #[serde(default)]
    pub previous_door_open_time: String,
    #[serde(default)]
    pub previous_door_open_pressure: Option<f64>,

    #[serde(default)]
    pub door_close_time: String,
    #[serde(default)]
    pub door_close_pressure: Option<f64>,

    #[serde(default)]
    pub vacuum_finish_time: String,
    #[serde(default)]
    pub vacuum_finish_pressure: Option<f64>,

    #[serde(default)]
    pub slow_steam_start_time: String,
    #[serde(default)]
    pub slow_steam_start_pressure: Option<f64>,

    #[serde(default)]
    pub fast_steam_start_time: String,
    #[serde(default)]
    pub fast_steam_start_pressure: Option<f64>,

    #[serde(default)]
    pub max_pressure_time: String,
    #[serde(default)]
    pub max_pressure: Option<f64>,

    #[serde(default)]
    pub release_start_time: String,
    #[serde(default)]
    pub release_start_pressure: Option<f64>,

    #[serde(default)]
    pub door_open_time: String,
    #[serde(default)]
    pub door_open_pressure: Option<f64>,

    #[serde(default)]
    pub door_close_duration: Option<String>,
    #[serde(default)]
    pub vacuum_finish_duration: Option<String>,
    #[serde(default)]
    pub slow_steam_duration: Option<String>,
    #[serde(default)]
    pub fast_steam_duration: Option<String>,
    #[serde(default)]
    pub max_pressure_duration: Option<String>,
    #[serde(default)]
    pub release_start_duration: Option<String>,
    #[serde(default)]
    pub door_open_duration: Option<String>,
}

impl AutoclaveRecord {
    /// Whether `batch_id` was cured in this run.
    pub fn processes(&self, batch_id: &str) -> bool {
        let batch_id = batch_id.trim();
        self.batches_processed.iter().any(|id| id == batch_id)
    }

    /// Phase readings in run order.
    pub fn phases(&self) -> [PhaseReading<'_>; 7] {
        AutoclavePhase::ALL.map(|phase| {
            let (time, pressure, duration) = match phase {
                AutoclavePhase::DoorClose => (
                    &self.door_close_time,
                    self.door_close_pressure,
                    &self.door_close_duration,
                ),
                AutoclavePhase::VacuumFinish => (
                    &self.vacuum_finish_time,
                    self.vacuum_finish_pressure,
                    &self.vacuum_finish_duration,
                ),
                AutoclavePhase::SlowSteamStart => (
                    &self.slow_steam_start_time,
                    self.slow_steam_start_pressure,
                    &self.slow_steam_duration,
                ),
                AutoclavePhase::FastSteamStart => (
                    &self.fast_steam_start_time,
                    self.fast_steam_start_pressure,
                    &self.fast_steam_duration,
                ),
                AutoclavePhase::MaxPressure => (
                    &self.max_pressure_time,
                    self.max_pressure,
                    &self.max_pressure_duration,
                ),
                AutoclavePhase::ReleaseStart => (
                    &self.release_start_time,
                    self.release_start_pressure,
                    &self.release_start_duration,
                ),
                AutoclavePhase::DoorOpen => (
                    &self.door_open_time,
                    self.door_open_pressure,
                    &self.door_open_duration,
                ),
            };
            PhaseReading {
                phase,
                time: time.as_str(),
                pressure,
                duration: duration.as_deref(),
            }
        })
    }

    /// Clock time the duration of `phase` is measured from.
    ///
    /// The first phase is measured from the previous run's door opening.
    pub fn phase_start(&self, phase: AutoclavePhase) -> &str {
        match phase {
            AutoclavePhase::DoorClose => &self.previous_door_open_time,
            AutoclavePhase::VacuumFinish => &self.door_close_time,
            AutoclavePhase::SlowSteamStart => &self.vacuum_finish_time,
            AutoclavePhase::FastSteamStart => &self.slow_steam_start_time,
            AutoclavePhase::MaxPressure => &self.fast_steam_start_time,
            AutoclavePhase::ReleaseStart => &self.max_pressure_time,
            AutoclavePhase::DoorOpen => &self.release_start_time,
        }
    }

    /// Sets the recorded duration of `phase`.
    pub fn set_duration(&mut self, phase: AutoclavePhase, duration: String) {
        let slot = match phase {
            AutoclavePhase::DoorClose => &mut self.door_close_duration,
            AutoclavePhase::VacuumFinish => &mut self.vacuum_finish_duration,
            AutoclavePhase::SlowSteamStart => &mut self.slow_steam_duration,
            AutoclavePhase::FastSteamStart => &mut self.fast_steam_duration,
            AutoclavePhase::MaxPressure => &mut self.max_pressure_duration,
            AutoclavePhase::ReleaseStart => &mut self.release_start_duration,
            AutoclavePhase::DoorOpen => &mut self.door_open_duration,
        };
        *slot = Some(duration);
    }
}
