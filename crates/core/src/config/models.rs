//! Configuration models that aggregate all settings.
//!
//! This module provides the unified `AppConfig` structure that combines
//! plant settings with the batch and autoclave records found in the data
//! directory into a single configuration object.

use aac_protocol::autoclave_models::AutoclaveRecord;
use aac_protocol::batch_models::BatchRecord;
use aac_protocol::config_models::PlantConfig;
use std::path::{Path, PathBuf};

/// Name of the project directory holding `config.toml` and the data directory.
pub const PROJECT_DIR: &str = ".aac-neo";

/// Unified application configuration loaded from the `.aac-neo/` directory.
///
/// This structure aggregates all configuration sources:
/// - `config.toml`: Plant settings
/// - `<data_dir>/batches/*.yaml`: Batch records
/// - `<data_dir>/autoclaves/*.yaml`: Autoclave runs
///
/// # Example
///
/// ```rust,no_run
/// use aac_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Loaded {} batches and {} autoclave runs",
///          config.batches.len(),
///          config.autoclaves.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Plant settings from `config.toml`.
    pub plant: PlantConfig,

    /// The `.aac-neo/` directory the configuration was read from.
    pub project_dir: PathBuf,

    /// All batch records loaded from the data directory.
    pub batches: Vec<BatchRecord>,

    /// All autoclave runs loaded from the data directory.
    pub autoclaves: Vec<AutoclaveRecord>,
}

impl AppConfig {
    /// Configuration for `root` with default plant settings and no records.
    pub fn empty(root: &Path) -> Self {
        Self {
            plant: PlantConfig::default(),
            project_dir: root.join(PROJECT_DIR),
            batches: Vec::new(),
            autoclaves: Vec::new(),
        }
    }

    /// Absolute data directory: `data_dir` resolved against the project directory.
    pub fn data_dir(&self) -> PathBuf {
        resolve_data_dir(&self.project_dir, &self.plant)
    }
}

pub(crate) fn resolve_data_dir(project_dir: &Path, plant: &PlantConfig) -> PathBuf {
    if plant.data_dir.is_absolute() {
        plant.data_dir.clone()
    } else {
        project_dir.join(&plant.data_dir)
    }
}
