//! Configuration loading and management.
//!
//! This module provides functionality to load plant settings and stored
//! records from the `.aac-neo/` directory structure.

pub mod error;
pub mod loader;
pub mod models;
