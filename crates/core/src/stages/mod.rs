//! Stage resolution.
//!
//! - [`resolver`]: derives the per-stage status vector of a batch
//! - [`transition`]: overall status changes caused by moving a stage

pub mod resolver;
pub mod transition;

pub use resolver::{autoclave_for_batch, autoclave_processed, resolve_stages, summarize};
pub use transition::status_after_stage_update;
