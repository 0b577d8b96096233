//! Directory structure and file generation for `.aac-neo` initialization.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use crate::config::loader::{AUTOCLAVES_DIR, BATCHES_DIR};
use crate::config::models::PROJECT_DIR;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for initializing a .aac-neo directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Target directory where .aac-neo will be created.
    pub target_dir: PathBuf,

    /// Overwrite existing .aac-neo files if the directory exists.
    pub force: bool,

    /// Only write `config.toml` and empty record directories, no samples.
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Generate a `.aac-neo` directory structure with templates.
///
/// This function creates the following structure:
/// ```text
/// .aac-neo/
/// ├── config.toml
/// └── data/
///     ├── batches/
///     │   ├── 1511.yaml (unless minimal)
///     │   └── 1520.yaml (unless minimal)
///     └── autoclaves/
///         └── 101.yaml (unless minimal)
/// ```
///
/// Returns the paths of the files written.
///
/// # Errors
///
/// Returns an `InitError` if:
/// - The .aac-neo directory already exists (without force flag)
/// - A template file cannot be found
/// - File system operations fail
pub async fn generate_project_structure(options: InitOptions) -> InitResult<Vec<PathBuf>> {
    let project_dir = options.target_dir.join(PROJECT_DIR);

    if project_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(project_dir));
    }

    let data_dir = project_dir.join("data");
    for sub in [BATCHES_DIR, AUTOCLAVES_DIR] {
        let path = data_dir.join(sub);
        fs::create_dir_all(&path).map_err(|source| InitError::DirectoryCreate { path, source })?;
    }

    let mut written = vec![write_template_file(&project_dir, "config.toml")?];

    if !options.minimal {
        for sample in list_templates("data/") {
            written.push(write_template_file(&project_dir, &sample)?);
        }
    }

    tracing::info!(
        project_dir = %project_dir.display(),
        files = written.len(),
        "initialized project"
    );

    Ok(written)
}

/// Writes one template below `project_dir`, creating parent directories.
fn write_template_file(project_dir: &Path, template_path: &str) -> InitResult<PathBuf> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = project_dir.join(template_path);

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path.clone(),
        source,
    })?;

    Ok(target_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::load_config;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_generate_structure_success() {
        let dir = tempdir().expect("Failed to create temp dir");
        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: false,
            minimal: false,
        };

        let written = generate_project_structure(options)
            .await
            .expect("Failed to generate structure");

        let project_dir = dir.path().join(".aac-neo");
        assert!(project_dir.join("config.toml").exists());
        assert!(project_dir.join("data/batches/1520.yaml").exists());
        assert!(project_dir.join("data/autoclaves/101.yaml").exists());
        assert_eq!(written.len(), 1 + list_templates("data/").len());

        // The generated project loads cleanly
        let config = load_config(dir.path()).await.expect("Generated project should load");
        assert_eq!(config.batches.len(), list_templates("data/batches/").len());
        assert_eq!(config.autoclaves.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_structure_minimal() {
        let dir = tempdir().expect("Failed to create temp dir");
        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: false,
            minimal: true,
        };

        generate_project_structure(options)
            .await
            .expect("Failed to generate structure");

        let project_dir = dir.path().join(".aac-neo");
        assert!(project_dir.join("config.toml").exists());
        assert!(project_dir.join("data/batches").is_dir());
        assert!(!project_dir.join("data/batches/1520.yaml").exists());
    }

    #[tokio::test]
    async fn test_generate_structure_already_exists() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join(".aac-neo")).expect("Failed to create .aac-neo");

        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: false,
            minimal: false,
        };

        let result = generate_project_structure(options).await;
        assert!(matches!(result, Err(InitError::DirectoryExists(_))));
    }

    #[tokio::test]
    async fn test_generate_structure_force_overwrites() {
        let dir = tempdir().expect("Failed to create temp dir");
        let project_dir = dir.path().join(".aac-neo");
        fs::create_dir_all(&project_dir).expect("Failed to create .aac-neo");
        fs::write(project_dir.join("config.toml"), "plant_name = \"old\"")
            .expect("Failed to write config.toml");

        let options = InitOptions {
            target_dir: dir.path().to_path_buf(),
            force: true,
            minimal: true,
        };

        generate_project_structure(options)
            .await
            .expect("Force should overwrite");

        let config = fs::read_to_string(project_dir.join("config.toml")).expect("read config");
        assert!(config.contains("plant_name = \"AAC Plant\""));
    }
}
