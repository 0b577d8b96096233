use std::path::PathBuf;

use aac_core::config::models::AppConfig;
use aac_protocol::autoclave_models::AutoclaveRecord;
use clap::Subcommand;
use color_eyre::eyre::Result;
use colored::Colorize;

use super::{open_manager, print_json, read_document, report};

#[derive(Subcommand, Debug)]
pub enum AutoclaveCommands {
    /// Record an autoclave run and advance the batches it cured
    Add {
        /// YAML or JSON file holding the run
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List recorded autoclave runs
    #[command(alias = "ls")]
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the phases of one autoclave run
    Show {
        /// Autoclave number
        autoclave_id: u32,
    },
}

pub async fn run(config: &AppConfig, cmd: AutoclaveCommands) -> Result<()> {
    match cmd {
        AutoclaveCommands::Add { file } => add(config, read_document(&file)?).await,
        AutoclaveCommands::List { json } => list(config, json),
        AutoclaveCommands::Show { autoclave_id } => show(config, autoclave_id),
    }
}

async fn add(config: &AppConfig, run: AutoclaveRecord) -> Result<()> {
    let autoclave_id = run.autoclave_id;
    let listed = run.batches_processed.len();

    let manager = open_manager(config).await?;
    let updated = manager.record_autoclave_run(run).await.map_err(report)?;

    println!(
        "{} autoclave run {} ({} of {} batches updated)",
        "Recorded".green().bold(),
        autoclave_id.to_string().bold(),
        updated.len(),
        listed
    );
    for batch_id in &updated {
        println!("  {} -> segregation", batch_id);
    }
    if updated.len() < listed {
        println!(
            "  {}",
            "some listed batches are not on record and were skipped".yellow()
        );
    }
    Ok(())
}

fn list(config: &AppConfig, json: bool) -> Result<()> {
    if json {
        return print_json(&config.autoclaves);
    }
    if config.autoclaves.is_empty() {
        println!("{}", "No autoclave runs recorded".dimmed());
        return Ok(());
    }

    println!(
        "{:<10} {:<8} {:<10} {}",
        "AUTOCLAVE".bold(),
        "SHIFT".bold(),
        "DOOR OPEN".bold(),
        "BATCHES".bold()
    );
    for run in &config.autoclaves {
        println!(
            "{:<10} {:<8} {:<10} {}",
            run.autoclave_id,
            run.shift,
            run.door_open_time,
            run.batches_processed.join(", ")
        );
    }
    Ok(())
}

fn show(config: &AppConfig, autoclave_id: u32) -> Result<()> {
    let Some(run) = config
        .autoclaves
        .iter()
        .find(|run| run.autoclave_id == autoclave_id)
    else {
        color_eyre::eyre::bail!("Autoclave {} not found", autoclave_id);
    };

    println!(
        "Autoclave {} ({} shift): {}",
        run.autoclave_id.to_string().bold(),
        run.shift,
        run.batches_processed.join(", ")
    );
    for reading in run.phases() {
        let pressure = reading
            .pressure
            .map(|p| format!("{p} bar"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<18} {:<8} {:<10} {}",
            reading.phase.label(),
            reading.time,
            pressure,
            reading.duration.unwrap_or("-")
        );
    }
    Ok(())
}
