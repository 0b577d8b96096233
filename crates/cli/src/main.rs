//! aac - AAC plant production tracker
//!
//! Records batches as they move down the line, derives their stage status,
//! and analyzes cutting-stage rejections locally or over HTTP.

use std::path::PathBuf;

use aac_core::config::loader::load_config;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod output;

use commands::analyze::{AnalyzeArgs, AnalyzeKind, FetchCommands};
use commands::autoclave::AutoclaveCommands;
use commands::batch::BatchCommands;

/// aac - AAC plant production tracker
#[derive(Parser, Debug)]
#[command(name = "aac")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Project root containing the .aac-neo directory
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides RUST_LOG and
    /// the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a .aac-neo directory with a config file and sample records
    Init {
        /// Overwrite an existing .aac-neo directory
        #[arg(long)]
        force: bool,

        /// Skip the sample records
        #[arg(long)]
        minimal: bool,
    },

    /// Batch management
    #[command(subcommand)]
    Batch(BatchCommands),

    /// Record an operator report for one stage of a batch
    Record {
        /// Stage the report is for (batching, ferry-cart, tilting, cutting,
        /// autoclave, segregation)
        stage: String,

        /// Batch number
        batch_id: String,

        /// YAML or JSON file holding the report
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Autoclave run management
    #[command(subcommand)]
    Autoclave(AutoclaveCommands),

    /// Analyze cutting-stage rejections
    Analyze(AnalyzeArgs),

    /// Query a remote analysis API
    #[command(subcommand)]
    Fetch(FetchCommands),

    /// Serve the analysis API
    Serve {
        /// Address to bind (defaults to the config file's server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to the config file's server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Installs the global subscriber.
///
/// The filter comes from `--log-level`, then `RUST_LOG`, then the config
/// file's `log_level`. Logs go to stderr so command output stays pipeable.
fn init_tracing(cli_level: Option<&str>, config_level: &str) {
    let filter = cli_level
        .and_then(|level| EnvFilter::try_new(level).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .or_else(|| EnvFilter::try_new(config_level).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = load_config(&cli.root).await;
    let config_level = config
        .as_ref()
        .map(|c| c.plant.log_level.clone())
        .unwrap_or_else(|_| "warn".to_string());
    init_tracing(cli.log_level.as_deref(), &config_level);

    if let Commands::Init { force, minimal } = cli.command {
        return commands::init::run(&cli.root, force, minimal).await;
    }
    let config = config?;

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Batch(cmd) => commands::batch::run(&config, cmd).await,
        Commands::Record {
            stage,
            batch_id,
            file,
        } => commands::batch::record(&config, &stage, &batch_id, &file).await,
        Commands::Autoclave(cmd) => commands::autoclave::run(&config, cmd).await,
        Commands::Analyze(args) => match args.kind {
            AnalyzeKind::Quality => commands::analyze::quality(&config, &args).await,
            AnalyzeKind::Trends => commands::analyze::trends(&config, &args).await,
            AnalyzeKind::Moulds => commands::analyze::moulds(&config, &args).await,
        },
        Commands::Fetch(cmd) => commands::analyze::fetch(&config, cmd).await,
        Commands::Serve { host, port } => commands::serve::run(&config, host, port).await,
    }
}
