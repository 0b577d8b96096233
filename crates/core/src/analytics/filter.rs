//! Selecting the batches an analysis runs over.

use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use aac_protocol::analytics_models::{AnalysisQuery, GroupBy};
use aac_protocol::batch_models::BatchRecord;
use chrono::NaiveDate;

/// Parses an optional `YYYY-MM-DD` query parameter named `param`.
///
/// Absent and empty values mean "no bound".
pub fn parse_date(param: &'static str, value: Option<&str>) -> AnalyticsResult<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AnalyticsError::InvalidDate { param }),
    }
}

/// Parses the trend grouping, defaulting to [`GroupBy::Day`].
pub fn parse_group_by(value: Option<&str>) -> AnalyticsResult<GroupBy> {
    match value {
        None => Ok(GroupBy::default()),
        Some(value) => value.parse().map_err(|_| AnalyticsError::InvalidGroupBy),
    }
}

/// Batches whose production date lies within the query's bounds (both
/// inclusive) and, if a mould is given, that were cast in it.
///
/// # Errors
///
/// - `AnalyticsError::InvalidDate` if `start_date` or `end_date` is malformed
/// - `AnalyticsError::NoBatches` if nothing matches
pub fn filter_batches<'a>(
    batches: &'a [BatchRecord],
    query: &AnalysisQuery,
) -> AnalyticsResult<Vec<&'a BatchRecord>> {
    let start = parse_date("start_date", query.start_date.as_deref())?;
    let end = parse_date("end_date", query.end_date.as_deref())?;
    let mould = query.mould_id.as_deref().filter(|m| !m.is_empty());

    let selected: Vec<&BatchRecord> = batches
        .iter()
        .filter(|batch| start.map_or(true, |start| batch.date >= start))
        .filter(|batch| end.map_or(true, |end| batch.date <= end))
        .filter(|batch| mould.map_or(true, |mould| batch.mould_id == mould))
        .collect();

    if selected.is_empty() {
        return Err(AnalyticsError::NoBatches);
    }
    Ok(selected)
}
