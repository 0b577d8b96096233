//! Batch record construction and operator reports.
//!
//! - [`builder`]: new batch records with stage defaults
//! - [`reports`]: writing operator stage reports onto records
//! - [`time`]: clock-time parsing and durations

pub mod builder;
pub mod reports;
pub mod time;

pub use builder::{current_shift, new_batch};
pub use reports::{apply_report, prepare_autoclave_run, total_defects};
