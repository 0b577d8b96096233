//! Plant configuration models for `.aac-neo/config.toml`.
//!
//! This module defines the structure of the project configuration file that
//! controls where records are stored and how the analysis API is served.

use serde::Deserialize;
use serde::Serialize;
use std::path::PathBuf;
use ts_rs::TS;

/// Represents plant-wide settings from `.aac-neo/config.toml`.
///
/// Every field has a default, so an empty or missing file is valid.
///
/// # Example
///
/// ```toml
/// # .aac-neo/config.toml
/// plant_name = "Line 2"
/// data_dir = "data"
/// analysis_api_url = "http://localhost:8000"
/// log_level = "info"
///
/// [server]
/// host = "0.0.0.0"
/// port = 8000
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(default)]
pub struct PlantConfig {
    /// Display name shown in CLI banners and the API root message.
    pub plant_name: String,

    /// Directory holding batch and autoclave snapshots.
    ///
    /// Relative paths are resolved against the `.aac-neo/` directory.
    #[ts(type = "string")]
    pub data_dir: PathBuf,

    /// Where the analysis API listens when served locally.
    pub server: ServerSettings,

    /// Base URL of a remote analysis API, used by `aac fetch`.
    pub analysis_api_url: String,

    /// Default log filter when neither `--log-level` nor `RUST_LOG` is set.
    pub log_level: String,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            plant_name: "AAC Plant".to_string(),
            data_dir: PathBuf::from("data"),
            server: ServerSettings::default(),
            analysis_api_url: "http://localhost:8000".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}
