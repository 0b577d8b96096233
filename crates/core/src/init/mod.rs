//! Initialization module for creating `.aac-neo` directory structures.
//!
//! This module provides functionality to initialize a new plant project by
//! generating a `.aac-neo/` directory with:
//! - Plant configuration (`config.toml`)
//! - Sample batch records (`data/batches/*.yaml`)
//! - A sample autoclave run (`data/autoclaves/*.yaml`)
//!
//! # Example
//!
//! ```no_run
//! use aac_core::init::{InitOptions, generate_project_structure};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//!     minimal: false,
//! };
//!
//! generate_project_structure(options).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

// Re-export commonly used types for convenience
pub use error::{InitError, InitResult};
pub use generator::{generate_project_structure, InitOptions};
pub use templates::{get_template, list_templates};
