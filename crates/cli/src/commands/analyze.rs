use aac_core::analytics::{self, parse_date};
use aac_core::client::AnalysisClient;
use aac_core::config::models::AppConfig;
use aac_protocol::analytics_models::{AnalysisQuery, MouldPerformance};
use clap::{Args, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use colored::Colorize;

use super::print_json;
use crate::output;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeKind {
    /// Overall rejection rate and breakdown by rejection type
    Quality,
    /// Rejection rates per day, week or month
    Trends,
    /// Rejection rates per mould, worst first
    Moulds,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Which analysis to run
    #[arg(value_enum)]
    pub kind: AnalyzeKind,

    /// First batch date to include (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Last batch date to include (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Only batches cast in this mould (quality only)
    #[arg(long)]
    pub mould: Option<String>,

    /// Trend period: day, week or month
    #[arg(long)]
    pub group_by: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl AnalyzeArgs {
    fn query(&self) -> AnalysisQuery {
        AnalysisQuery {
            start_date: self.start.clone(),
            end_date: self.end.clone(),
            mould_id: self.mould.clone(),
            group_by: self.group_by.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum FetchCommands {
    /// Per-mould rejection rates from a running analysis API
    Moulds {
        /// Base URL of the API (defaults to the config file's analysis_api_url)
        #[arg(long)]
        url: Option<String>,

        /// First batch date to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,

        /// Last batch date to include (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

pub async fn quality(config: &AppConfig, args: &AnalyzeArgs) -> Result<()> {
    let stats = analytics::quality_report(&config.batches, &args.query())?;
    if args.json {
        return print_json(&stats);
    }

    println!(
        "{} of {} batches rejected ({})",
        stats.rejected_batches,
        stats.total_batches,
        output::rate(stats.rejection_rate)
    );
    println!("Most common rejection: {}", stats.most_common_rejection.bold());
    println!();
    println!(
        "{:<20} {:>6} {:>9}",
        "REJECTION".bold(),
        "COUNT".bold(),
        "SHARE".bold()
    );
    for summary in &stats.rejection_by_type {
        println!(
            "{:<20} {:>6} {:>8.2}%",
            summary.rejection_type, summary.count, summary.percentage
        );
    }
    Ok(())
}

pub async fn trends(config: &AppConfig, args: &AnalyzeArgs) -> Result<()> {
    let trends = analytics::trends_report(&config.batches, &args.query())?;
    if args.json {
        return print_json(&trends);
    }

    println!(
        "{:<12} {:>6} {:>9} {:>9} {:>9} {:>9}",
        "PERIOD".bold(),
        "TOTAL".bold(),
        "REJECTED".bold(),
        "RATE".bold(),
        "CHIPPING".bold(),
        "JOINED".bold()
    );
    for trend in &trends {
        println!(
            "{:<12} {:>6} {:>9} {:>9} {:>9} {:>9}",
            trend.period,
            trend.total_batches,
            trend.rejected_batches,
            output::rate(trend.rejection_rate),
            trend.chipping_rejections,
            trend.joined_rejections
        );
    }
    Ok(())
}

pub async fn moulds(config: &AppConfig, args: &AnalyzeArgs) -> Result<()> {
    let performance = analytics::mould_report(&config.batches, &args.query())?;
    if args.json {
        return print_json(&performance);
    }
    print_moulds(&performance);
    Ok(())
}

pub async fn fetch(config: &AppConfig, cmd: FetchCommands) -> Result<()> {
    match cmd {
        FetchCommands::Moulds {
            url,
            start,
            end,
            json,
        } => {
            let start = parse_date("start_date", start.as_deref())?;
            let end = parse_date("end_date", end.as_deref())?;
            let base_url = url.unwrap_or_else(|| config.plant.analysis_api_url.clone());

            let client = AnalysisClient::new(base_url);
            let performance = client.mould_performance(start, end).await?;
            if json {
                return print_json(&performance);
            }
            if performance.is_empty() {
                println!(
                    "{}",
                    format!("No batches found at {}", client.base_url()).dimmed()
                );
                return Ok(());
            }
            print_moulds(&performance);
            Ok(())
        }
    }
}

fn print_moulds(performance: &[MouldPerformance]) {
    println!(
        "{:<10} {:>6} {:>9} {:>9}",
        "MOULD".bold(),
        "TOTAL".bold(),
        "REJECTED".bold(),
        "RATE".bold()
    );
    for mould in performance {
        println!(
            "{:<10} {:>6} {:>9} {:>9}",
            mould.mould_id,
            mould.total_batches,
            mould.rejected_batches,
            output::rate(mould.rejection_rate)
        );
    }
}
