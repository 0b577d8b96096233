//! # aac-protocol
//!
//! Shared data models for AAC production tracking.
//!
//! This crate defines all shared data structures used for:
//! - Batch and autoclave records as they are persisted and exchanged
//! - The derived six-stage status vector
//! - Operator stage reports
//! - Analysis API payloads
//! - The store change feed
//!
//! ## Modules
//!
//! - [`batch_models`]: Batch records and their per-stage sub-records
//! - [`autoclave_models`]: Autoclave runs and their phase readings
//! - [`stage_models`]: Stages, derived stage statuses and batch summaries
//! - [`report_models`]: Operator reports that complete a stage
//! - [`analytics_models`]: Quality, trend and mould performance payloads
//! - [`config_models`]: Plant configuration from config.toml
//! - [`ipc`]: Events published by the core store
//! - [`lenient`]: Forgiving deserializers for hand-entered numeric fields
//!
//! ## Design Principles
//!
//! - Minimal dependencies: only serde, chrono and ts-rs
//! - TypeScript generation: all types derive `TS` for client compatibility
//! - Independent compilation: no dependencies on other aac crates

pub mod analytics_models;
pub mod autoclave_models;
pub mod batch_models;
pub mod config_models;
pub mod ipc;
pub mod lenient;
pub mod report_models;
pub mod stage_models;

// Re-export all public types for convenience
pub use analytics_models::*;
pub use autoclave_models::*;
pub use batch_models::*;
pub use config_models::*;
pub use ipc::*;
pub use report_models::*;
pub use stage_models::*;
