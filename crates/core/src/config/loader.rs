//! Configuration file loader for the `.aac-neo/` directory structure.
//!
//! This module provides functionality to load and parse all files from the
//! `.aac-neo/` directory, including:
//! - `config.toml`: Plant settings
//! - `<data_dir>/batches/*.yaml`: Batch records
//! - `<data_dir>/autoclaves/*.yaml`: Autoclave runs

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::{resolve_data_dir, AppConfig, PROJECT_DIR};
use aac_protocol::autoclave_models::AutoclaveRecord;
use aac_protocol::batch_models::BatchRecord;
use aac_protocol::config_models::PlantConfig;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Subdirectory of the data directory holding batch records.
pub const BATCHES_DIR: &str = "batches";

/// Subdirectory of the data directory holding autoclave runs.
pub const AUTOCLAVES_DIR: &str = "autoclaves";

/// Loads all configuration from the `.aac-neo/` directory.
///
/// This function scans the `.aac-neo/` directory and loads:
/// - Plant configuration from `config.toml`
/// - Batch records from `<data_dir>/batches/*.yaml`
/// - Autoclave runs from `<data_dir>/autoclaves/*.yaml`
///
/// # Arguments
///
/// * `root` - Root directory containing the `.aac-neo/` folder
///
/// # Returns
///
/// An `AppConfig` containing all loaded configuration. If directories or files
/// are missing, returns an empty/default configuration rather than an error.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid syntax (TOML or YAML)
/// - Two record files carry the same batch or autoclave ID
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let project_dir = root.join(PROJECT_DIR);

    // If .aac-neo doesn't exist, return default config
    if !project_dir.exists() {
        return Ok(AppConfig::empty(root));
    }

    let plant = load_plant_config(&project_dir)?;
    let data_dir = resolve_data_dir(&project_dir, &plant);
    let (batches, autoclaves) = load_records(&data_dir)?;

    tracing::debug!(
        project_dir = %project_dir.display(),
        batches = batches.len(),
        autoclaves = autoclaves.len(),
        "configuration loaded"
    );

    Ok(AppConfig {
        plant,
        project_dir,
        batches,
        autoclaves,
    })
}

/// Loads plant configuration from `config.toml`.
fn load_plant_config(project_dir: &Path) -> ConfigResult<PlantConfig> {
    let config_path = project_dir.join("config.toml");

    // If config.toml doesn't exist, return default
    if !config_path.exists() {
        return Ok(PlantConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let config: PlantConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path.clone(),
            source,
        })?;

    if config.data_dir.as_os_str().is_empty() {
        return Err(ConfigError::InvalidConfig {
            path: config_path,
            reason: "data_dir must not be empty".to_string(),
        });
    }

    Ok(config)
}

/// Loads every batch and autoclave record stored under `data_dir`.
///
/// Missing subdirectories yield empty lists. Records are returned in file
/// name order.
///
/// # Errors
///
/// Returns `ConfigError::InvalidConfig` when two files carry the same
/// `batchId` or `autoclaveId`.
pub fn load_records(data_dir: &Path) -> ConfigResult<(Vec<BatchRecord>, Vec<AutoclaveRecord>)> {
    let batches_dir = data_dir.join(BATCHES_DIR);
    let batches: Vec<(PathBuf, BatchRecord)> = load_yaml_dir(&batches_dir)?;
    let mut seen = HashSet::new();
    for (path, batch) in &batches {
        if !seen.insert(batch.batch_id.clone()) {
            return Err(ConfigError::InvalidConfig {
                path: path.clone(),
                reason: format!("duplicate batchId '{}'", batch.batch_id),
            });
        }
    }

    let autoclaves_dir = data_dir.join(AUTOCLAVES_DIR);
    let autoclaves: Vec<(PathBuf, AutoclaveRecord)> = load_yaml_dir(&autoclaves_dir)?;
    let mut seen = HashSet::new();
    for (path, autoclave) in &autoclaves {
        if !seen.insert(autoclave.autoclave_id) {
            return Err(ConfigError::InvalidConfig {
                path: path.clone(),
                reason: format!("duplicate autoclaveId {}", autoclave.autoclave_id),
            });
        }
    }

    Ok((
        batches.into_iter().map(|(_, batch)| batch).collect(),
        autoclaves.into_iter().map(|(_, autoclave)| autoclave).collect(),
    ))
}

/// Loads all `.yaml`/`.yml` files directly inside `dir`.
fn load_yaml_dir<T: DeserializeOwned>(dir: &Path) -> ConfigResult<Vec<(PathBuf, T)>> {
    // If the directory doesn't exist, return empty vector
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut records = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: dir.to_path_buf(),
            source,
        })?;

        let path = entry.path();

        // Only process .yaml and .yml files
        let ext = path.extension().and_then(|s| s.to_str());
        if ext != Some("yaml") && ext != Some("yml") {
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let record: T = serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
            path: path.to_path_buf(),
            source,
        })?;

        records.push((path.to_path_buf(), record));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const BATCH_YAML: &str = r#"_id: batch_1520_20250409
batchId: "1520"
mouldId: M4
status: In Progress
date: 2025-04-09
processSteps:
  batching:
    process:
      dischargeTime: "08:42"
metadata:
  createdAt: 2025-04-09T08:15:00Z
  updatedAt: 2025-04-09T08:45:00Z
  createdBy: app_user
"#;

    #[tokio::test]
    async fn test_load_config_acceptance() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();
        let project_dir = root.join(".aac-neo");

        fs::create_dir_all(project_dir.join("records/batches")).expect("Failed to create batches dir");
        fs::create_dir_all(project_dir.join("records/autoclaves"))
            .expect("Failed to create autoclaves dir");

        let config_toml = r#"
plant_name = "Line 2"
data_dir = "records"

[server]
port = 9100
"#;
        fs::write(project_dir.join("config.toml"), config_toml).expect("Failed to write config.toml");
        fs::write(project_dir.join("records/batches/1520.yaml"), BATCH_YAML)
            .expect("Failed to write batch file");
        fs::write(
            project_dir.join("records/autoclaves/101.yml"),
            "autoclaveId: 101\nbatchesProcessed: \"1510, 1520\"\n",
        )
        .expect("Failed to write autoclave file");

        let config = load_config(root).await.expect("Failed to load config");

        assert_eq!(config.plant.plant_name, "Line 2");
        assert_eq!(config.plant.server.port, 9100);
        assert_eq!(config.plant.server.host, "127.0.0.1");
        assert_eq!(config.data_dir(), project_dir.join("records"));

        assert_eq!(config.batches.len(), 1, "Should load 1 batch");
        assert_eq!(config.batches[0].batch_id, "1520");
        assert_eq!(
            config.batches[0].process_steps.batching.process.discharge_time,
            "08:42"
        );

        assert_eq!(config.autoclaves.len(), 1, "Should load 1 autoclave run");
        assert_eq!(config.autoclaves[0].batches_processed, vec!["1510", "1520"]);
    }

    #[tokio::test]
    async fn test_load_config_empty_directory() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();

        let config = load_config(root)
            .await
            .expect("Should handle missing .aac-neo");

        assert_eq!(config.plant, PlantConfig::default());
        assert!(config.batches.is_empty(), "Should have no batches");
        assert!(config.autoclaves.is_empty(), "Should have no autoclaves");
        assert_eq!(config.data_dir(), root.join(".aac-neo/data"));
    }

    #[tokio::test]
    async fn test_load_config_invalid_toml() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();
        let project_dir = root.join(".aac-neo");

        fs::create_dir_all(&project_dir).expect("Failed to create .aac-neo");
        fs::write(project_dir.join("config.toml"), "plant_name = [invalid toml")
            .expect("Failed to write config.toml");

        let result = load_config(root).await;

        if let Err(ConfigError::TomlParse { path, .. }) = result {
            assert!(path.ends_with("config.toml"));
        } else {
            panic!("Expected TomlParse error");
        }
    }

    #[tokio::test]
    async fn test_load_config_empty_data_dir_is_invalid() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();
        let project_dir = root.join(".aac-neo");

        fs::create_dir_all(&project_dir).expect("Failed to create .aac-neo");
        fs::write(project_dir.join("config.toml"), "data_dir = \"\"")
            .expect("Failed to write config.toml");

        let result = load_config(root).await;
        assert!(matches!(result, Err(ConfigError::InvalidConfig { .. })));
    }

    #[tokio::test]
    async fn test_load_config_invalid_yaml() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();
        let batches_dir = root.join(".aac-neo/data/batches");

        fs::create_dir_all(&batches_dir).expect("Failed to create batches dir");
        fs::write(batches_dir.join("broken.yaml"), "batchId: 1\n  invalid: [yaml")
            .expect("Failed to write batch file");

        let result = load_config(root).await;

        if let Err(ConfigError::YamlParse { path, .. }) = result {
            assert!(path.ends_with("broken.yaml"));
        } else {
            panic!("Expected YamlParse error");
        }
    }

    #[tokio::test]
    async fn test_load_config_rejects_duplicate_batch_ids() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();
        let batches_dir = root.join(".aac-neo/data/batches");

        fs::create_dir_all(&batches_dir).expect("Failed to create batches dir");
        fs::write(batches_dir.join("a.yaml"), BATCH_YAML).expect("Failed to write batch file");
        fs::write(batches_dir.join("b.yaml"), BATCH_YAML).expect("Failed to write batch file");

        let result = load_config(root).await;

        if let Err(ConfigError::InvalidConfig { path, reason }) = result {
            assert!(path.ends_with("b.yaml"));
            assert!(reason.contains("duplicate batchId '1520'"));
        } else {
            panic!("Expected InvalidConfig error");
        }
    }

    #[tokio::test]
    async fn test_load_config_ignores_non_matching_files() {
        let dir = tempdir().expect("Failed to create temp dir");
        let root = dir.path();
        let batches_dir = root.join(".aac-neo/data/batches");

        fs::create_dir_all(&batches_dir).expect("Failed to create batches dir");
        fs::write(batches_dir.join("notes.txt"), "Not a yaml file").expect("Failed to write txt file");
        fs::write(batches_dir.join("1520.yaml"), BATCH_YAML).expect("Failed to write batch file");

        let config = load_config(root)
            .await
            .expect("Should ignore non-matching files");

        assert_eq!(config.batches.len(), 1, "Should only load .yaml files");
    }
}
