//! Terminal formatting.

use aac_core::client::RateBand;
use aac_protocol::batch_models::BatchStatus;
use aac_protocol::stage_models::{BatchStages, StageStatus};
use colored::{ColoredString, Colorize};

pub fn stage_status(status: StageStatus) -> ColoredString {
    match status {
        StageStatus::Completed => status.as_str().green(),
        StageStatus::InProgress => status.as_str().yellow().bold(),
        StageStatus::Pending => status.as_str().dimmed(),
    }
}

pub fn batch_status(status: BatchStatus) -> ColoredString {
    match status {
        BatchStatus::Completed => status.as_slug().green(),
        BatchStatus::InProgress => status.as_slug().yellow(),
        BatchStatus::Pending => status.as_slug().dimmed(),
    }
}

/// A rejection percentage, colored by severity.
pub fn rate(value: f64) -> ColoredString {
    let text = format!("{:.2}%", value);
    match RateBand::of(value) {
        RateBand::Critical => text.red().bold(),
        RateBand::High => text.red(),
        RateBand::Elevated => text.yellow(),
        RateBand::Good => text.green(),
    }
}

/// One line per stage, in line order.
pub fn print_stages(stages: &BatchStages) {
    for (stage, status) in stages.iter() {
        println!("  {:<12} {}", stage.label(), stage_status(status));
    }
}

/// Compact one-letter-per-stage view for listings, e.g. `✓✓●···`.
pub fn stage_strip(stages: &BatchStages) -> String {
    stages
        .iter()
        .map(|(_, status)| match status {
            StageStatus::Completed => "✓".green().to_string(),
            StageStatus::InProgress => "●".yellow().to_string(),
            StageStatus::Pending => "·".dimmed().to_string(),
        })
        .collect()
}
