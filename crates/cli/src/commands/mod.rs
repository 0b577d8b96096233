//! Subcommand implementations.

pub mod analyze;
pub mod autoclave;
pub mod batch;
pub mod init;
pub mod serve;

use std::path::Path;
use std::sync::Arc;

use aac_core::config::models::AppConfig;
use aac_core::state::{StateManager, YamlDirectory};
use aac_protocol::ipc::Event;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;

/// Converts a manager error, keeping its whole cause chain in the message.
pub fn report(err: anyhow::Error) -> Report {
    eyre!("{:#}", err)
}

/// Opens the project's records for writing.
///
/// Store events are logged at debug level.
pub async fn open_manager(config: &AppConfig) -> Result<StateManager> {
    let backend = Arc::new(YamlDirectory::new(config.data_dir()));
    let (tx, mut rx) = mpsc::channel::<Event>(64);
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            tracing::debug!(?event, "store event");
        }
    });
    StateManager::load(backend, tx).await.map_err(report)
}

/// Reads a YAML (or JSON) document from `path`.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).wrap_err_with(|| format!("Failed to parse {}", path.display()))
}

/// Pretty JSON for `--json` output.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
