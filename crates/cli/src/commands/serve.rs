use aac_core::config::models::AppConfig;
use aac_core::server::{self, ServerConfig};
use color_eyre::eyre::Result;
use colored::Colorize;

use super::{open_manager, report};

pub async fn run(config: &AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    let settings = &config.plant.server;
    let server_config = ServerConfig {
        host: host.unwrap_or_else(|| settings.host.clone()),
        port: port.unwrap_or(settings.port),
        plant_name: config.plant.plant_name.clone(),
    };

    let manager = open_manager(config).await?;
    println!(
        "{} {} on http://{}:{} (Ctrl+C to stop)",
        "Serving".green().bold(),
        server_config.plant_name,
        server_config.host,
        server_config.port
    );
    server::serve(server_config, manager).await.map_err(report)
}
