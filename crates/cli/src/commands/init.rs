use std::path::Path;

use aac_core::config::models::PROJECT_DIR;
use aac_core::init::{generate_project_structure, InitOptions};
use color_eyre::eyre::Result;
use colored::Colorize;

pub async fn run(root: &Path, force: bool, minimal: bool) -> Result<()> {
    let options = InitOptions {
        target_dir: root.to_path_buf(),
        force,
        minimal,
    };
    let written = generate_project_structure(options).await?;

    println!("{} {}", "Initialized".green().bold(), root.join(PROJECT_DIR).display());
    for path in written {
        let shown = path.strip_prefix(root).unwrap_or(&path);
        println!("  {}", shown.display());
    }
    Ok(())
}
