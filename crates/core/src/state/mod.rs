//! State management for production records.
//!
//! This module provides:
//! - [`store`]: the in-memory batch store and its mutation rules
//! - [`persistence`]: snapshot backends the store is loaded from and written to
//! - [`manager`]: the StateManager that serializes writers and publishes events

pub mod error;
pub mod manager;
pub mod persistence;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use manager::StateManager;
pub use persistence::{SnapshotBackend, YamlDirectory};
pub use store::BatchStore;
