//! Batch quality analysis.
//!
//! Pure functions over batch records, backing the HTTP analysis API and the
//! `aac analyze` commands:
//! - [`filter`]: date and mould selection
//! - [`rejections`]: cutting-stage rejection causes
//! - [`quality`]: overall rejection statistics
//! - [`trends`]: rejection counts per day, week or month
//! - [`moulds`]: rejection rates per mould
//!
//! The `*_report` functions combine filtering and analysis the way each API
//! endpoint does.

pub mod error;
pub mod filter;
pub mod moulds;
pub mod quality;
pub mod rejections;
pub mod trends;

pub use error::{AnalyticsError, AnalyticsResult};
pub use filter::{filter_batches, parse_date, parse_group_by};
pub use moulds::mould_performance;
pub use quality::batch_quality;
pub use rejections::{has_rejections, rejection_counts, RejectionField};
pub use trends::{period_start, rejection_trends};

use aac_protocol::analytics_models::{
    AnalysisQuery, BatchQualityStats, MouldPerformance, RejectionTrend,
};
use aac_protocol::batch_models::BatchRecord;

/// Quality statistics for the batches selected by `query`.
pub fn quality_report(
    batches: &[BatchRecord],
    query: &AnalysisQuery,
) -> AnalyticsResult<BatchQualityStats> {
    let selected = filter_batches(batches, query)?;
    Ok(batch_quality(&selected))
}

/// Rejection trends for the batches dated within `query`'s bounds.
///
/// The mould filter does not apply. The grouping is validated only once
/// some batches were found, so an empty range reports `NoBatches` first.
pub fn trends_report(
    batches: &[BatchRecord],
    query: &AnalysisQuery,
) -> AnalyticsResult<Vec<RejectionTrend>> {
    let selected = filter_batches(batches, &dates_only(query))?;
    let group_by = parse_group_by(query.group_by.as_deref())?;
    Ok(rejection_trends(&selected, group_by))
}

/// Per-mould performance for the batches dated within `query`'s bounds.
///
/// The mould filter does not apply.
pub fn mould_report(
    batches: &[BatchRecord],
    query: &AnalysisQuery,
) -> AnalyticsResult<Vec<MouldPerformance>> {
    let selected = filter_batches(batches, &dates_only(query))?;
    Ok(mould_performance(&selected))
}

fn dates_only(query: &AnalysisQuery) -> AnalysisQuery {
    AnalysisQuery {
        start_date: query.start_date.clone(),
        end_date: query.end_date.clone(),
        mould_id: None,
        group_by: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::builder::new_batch;
    use chrono::{TimeZone, Utc};

    fn batches() -> Vec<BatchRecord> {
        let now = Utc
            .with_ymd_and_hms(2025, 4, 9, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        vec![new_batch("1", "M1", now), new_batch("2", "M2", now)]
    }

    #[test]
    fn test_trends_ignore_mould_filter() {
        let query = AnalysisQuery {
            mould_id: Some("M1".to_string()),
            ..Default::default()
        };
        let trends = trends_report(&batches(), &query).expect("trends");
        assert_eq!(trends[0].total_batches, 2);

        let quality = quality_report(&batches(), &query).expect("quality");
        assert_eq!(quality.total_batches, 1);

        let moulds = mould_report(&batches(), &query).expect("moulds");
        assert_eq!(moulds.len(), 2);
    }

    #[test]
    fn test_empty_range_is_reported_before_bad_grouping() {
        let query = AnalysisQuery {
            start_date: Some("2030-01-01".to_string()),
            group_by: Some("year".to_string()),
            ..Default::default()
        };
        assert_eq!(trends_report(&batches(), &query), Err(AnalyticsError::NoBatches));

        let query = AnalysisQuery {
            group_by: Some("year".to_string()),
            ..Default::default()
        };
        assert_eq!(trends_report(&batches(), &query), Err(AnalyticsError::InvalidGroupBy));
    }
}
