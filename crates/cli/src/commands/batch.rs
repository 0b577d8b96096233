use std::path::Path;

use aac_core::config::models::AppConfig;
use aac_core::state::BatchStore;
use aac_protocol::batch_models::{BatchRecord, BatchStatus};
use aac_protocol::report_models::StageReport;
use aac_protocol::stage_models::{Stage, StageStatus};
use clap::Subcommand;
use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use colored::Colorize;

use super::{open_manager, print_json, read_document, report};
use crate::output;

#[derive(Subcommand, Debug)]
pub enum BatchCommands {
    /// Create a batch stamped with the current local time
    Create {
        /// Batch number
        batch_number: String,

        /// Mould number
        mould_number: String,
    },

    /// List batches with their derived stages
    #[command(alias = "ls")]
    List {
        /// Only batches with this overall status (pending, in-progress, completed)
        #[arg(long)]
        status: Option<BatchStatus>,

        /// Only batches whose given stage has --stage-status
        #[arg(long, requires = "stage_status")]
        stage: Option<Stage>,

        /// Stage status to match with --stage (pending, in-progress, completed)
        #[arg(long, requires = "stage")]
        stage_status: Option<StageStatus>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a batch record
    Show {
        /// Batch number
        batch_id: String,
    },

    /// Show the derived stages of a batch
    Stages {
        /// Batch number
        batch_id: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Move a stage of a batch to a new status
    SetStage {
        /// Batch number
        batch_id: String,

        /// Stage to move
        stage: Stage,

        /// New status (pending, in-progress, completed)
        status: StageStatus,
    },
}

pub async fn run(config: &AppConfig, cmd: BatchCommands) -> Result<()> {
    match cmd {
        BatchCommands::Create {
            batch_number,
            mould_number,
        } => create(config, &batch_number, &mould_number).await,
        BatchCommands::List {
            status,
            stage,
            stage_status,
            json,
        } => list(config, status, stage.zip(stage_status), json).await,
        BatchCommands::Show { batch_id } => show(config, &batch_id).await,
        BatchCommands::Stages { batch_id, json } => stages(config, &batch_id, json).await,
        BatchCommands::SetStage {
            batch_id,
            stage,
            status,
        } => set_stage(config, &batch_id, stage, status).await,
    }
}

async fn create(config: &AppConfig, batch_number: &str, mould_number: &str) -> Result<()> {
    let manager = open_manager(config).await?;
    let batch = manager
        .create_batch(batch_number, mould_number)
        .await
        .map_err(report)?;

    println!(
        "{} batch {} on mould {} ({})",
        "Created".green().bold(),
        batch.batch_id.bold(),
        batch.mould_id,
        batch.id
    );
    Ok(())
}

async fn list(
    config: &AppConfig,
    status: Option<BatchStatus>,
    stage_filter: Option<(Stage, StageStatus)>,
    json: bool,
) -> Result<()> {
    let store = BatchStore::from_records(config.batches.clone(), config.autoclaves.clone())?;

    let mut selected: Vec<&BatchRecord> = match status {
        Some(status) => store.batches_by_status(status),
        None => store.batches().iter().collect(),
    };
    if let Some((stage, stage_status)) = stage_filter {
        let matching = store.batches_by_stage(stage, stage_status);
        selected.retain(|batch| matching.iter().any(|m| m.batch_id == batch.batch_id));
    }

    let summaries: Vec<_> = selected
        .iter()
        .filter_map(|batch| store.summary(&batch.batch_id))
        .collect();

    if json {
        return print_json(&summaries);
    }
    if summaries.is_empty() {
        println!("{}", "No batches found".dimmed());
        return Ok(());
    }

    println!(
        "{:<10} {:<8} {:<12} {:<12} {}",
        "BATCH".bold(),
        "MOULD".bold(),
        "DATE".bold(),
        "STATUS".bold(),
        "STAGES".bold()
    );
    for (batch, summary) in selected.iter().zip(&summaries) {
        let status = summary
            .overall_status()
            .map(output::batch_status)
            .unwrap_or_else(|| summary.status.as_str().normal());
        println!(
            "{:<10} {:<8} {:<12} {:<12} {}",
            summary.batch_number,
            summary.mould_number,
            batch.date,
            status,
            output::stage_strip(&summary.stages)
        );
    }
    Ok(())
}

async fn show(config: &AppConfig, batch_id: &str) -> Result<()> {
    let batch = config
        .batches
        .iter()
        .find(|batch| batch.batch_id == batch_id)
        .ok_or_else(|| eyre!("Batch {} not found", batch_id))?;
    print!("{}", serde_yaml::to_string(batch)?);
    Ok(())
}

async fn stages(config: &AppConfig, batch_id: &str, json: bool) -> Result<()> {
    let store = BatchStore::from_records(config.batches.clone(), config.autoclaves.clone())?;
    let summary = store
        .summary(batch_id)
        .ok_or_else(|| eyre!("Batch {} not found", batch_id))?;

    if json {
        return print_json(&summary.stages);
    }
    println!(
        "Batch {} (mould {}) is {}",
        summary.batch_number.bold(),
        summary.mould_number,
        summary.status
    );
    output::print_stages(&summary.stages);
    if let Some(run) = store.autoclave_for_batch(batch_id) {
        println!("  cured in autoclave {}", run.autoclave_id);
    }
    Ok(())
}

async fn set_stage(
    config: &AppConfig,
    batch_id: &str,
    stage: Stage,
    status: StageStatus,
) -> Result<()> {
    let manager = open_manager(config).await?;
    let moved = manager
        .update_batch_stage(batch_id, stage, status)
        .await
        .map_err(report)?;
    if !moved {
        bail!("Batch {} not found", batch_id);
    }

    let overall = manager
        .read(|store| store.batch(batch_id).map(|b| b.status))
        .await;
    println!(
        "{} {} of batch {} to {}",
        "Moved".green().bold(),
        stage.label(),
        batch_id.bold(),
        output::stage_status(status)
    );
    if let Some(overall) = overall {
        println!("  batch is now {}", output::batch_status(overall));
    }
    Ok(())
}

/// `aac record <stage> <id> --file report.yaml`
pub async fn record(config: &AppConfig, stage: &str, batch_id: &str, file: &Path) -> Result<()> {
    let stage: Stage = stage.parse().map_err(|e: String| eyre!(e))?;

    let mut document: serde_yaml::Value = read_document(file)?;
    let Some(fields) = document.as_mapping_mut() else {
        bail!("{} must contain a mapping of report fields", file.display());
    };
    fields.insert("stage".into(), stage.as_str().into());
    let stage_report: StageReport = serde_yaml::from_value(document)
        .wrap_err_with(|| format!("Invalid {} report in {}", stage, file.display()))?;

    let manager = open_manager(config).await?;
    manager
        .record_stage(batch_id, stage_report)
        .await
        .map_err(report)?;

    let stages = manager
        .read(|store| store.stages_for(batch_id))
        .await
        .ok_or_else(|| eyre!("Batch {} not found", batch_id))?;
    println!(
        "{} {} for batch {}",
        "Recorded".green().bold(),
        stage.label(),
        batch_id.bold()
    );
    output::print_stages(&stages);
    Ok(())
}
