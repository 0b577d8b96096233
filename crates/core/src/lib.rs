//! # aac-core
//!
//! Production tracking core for an autoclaved aerated concrete plant.
//!
//! This crate provides:
//! - Configuration loading from the `.aac-neo/` directory
//! - Batch record construction and operator stage reports
//! - Derivation of each batch's six-stage status vector
//! - A batch store with YAML persistence and a change feed
//! - Rejection analysis and its HTTP API, plus a client for remote APIs
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and management
//! - [`init`]: Project scaffolding for `aac init`
//! - [`batch`]: Batch records and stage reports
//! - [`stages`]: Stage resolution
//! - [`state`]: Batch store and state management
//! - [`analytics`]: Batch quality analysis
//! - [`server`]: HTTP analysis API
//! - [`client`]: Analysis API client

pub mod analytics;
pub mod batch;
pub mod client;
pub mod config;
pub mod init;
pub mod server;
pub mod stages;
pub mod state;
