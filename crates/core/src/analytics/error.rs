//! Error types for batch quality analysis.

use thiserror::Error;

/// Errors that can occur while filtering or analyzing batches.
///
/// The messages are returned verbatim to API clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// A date parameter is not `YYYY-MM-DD`.
    #[error("Invalid {param} format. Use YYYY-MM-DD")]
    InvalidDate { param: &'static str },

    /// The trend grouping is not `day`, `week` or `month`.
    #[error("Invalid group_by parameter. Use day, week, or month")]
    InvalidGroupBy,

    /// No batch matched the filters.
    #[error("No batches found matching the criteria")]
    NoBatches,
}

/// Type alias for Result with AnalyticsError.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
