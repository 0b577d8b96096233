//! Overall batch quality statistics.

use crate::analytics::rejections::{has_rejections, percentage, rejection_counts, round2};
use aac_protocol::analytics_models::{BatchQualityStats, RejectionSummary};
use aac_protocol::batch_models::BatchRecord;

/// Reported when no batch has any rejection.
pub const NO_REJECTION: &str = "None";

/// Rejection statistics over `batches`.
///
/// Only causes that occurred are listed, most frequent first; ties keep
/// reporting order. The most common rejection is the first cause reaching
/// the highest count.
pub fn batch_quality(batches: &[&BatchRecord]) -> BatchQualityStats {
    let total = u32::try_from(batches.len()).unwrap_or(u32::MAX);
    let rejected = batches.iter().filter(|batch| has_rejections(batch)).count();
    let rejected = u32::try_from(rejected).unwrap_or(u32::MAX);

    let mut by_type: Vec<RejectionSummary> = Vec::new();
    let mut most_common: Option<(u32, String)> = None;

    for (field, count) in rejection_counts(batches) {
        if count == 0 {
            continue;
        }
        let name = field.readable_name();
        if most_common.as_ref().map_or(true, |(max, _)| count > *max) {
            most_common = Some((count, name.clone()));
        }
        by_type.push(RejectionSummary {
            rejection_type: name,
            count,
            percentage: round2(percentage(count, total)),
        });
    }
    by_type.sort_by(|a, b| b.count.cmp(&a.count));

    BatchQualityStats {
        total_batches: total,
        rejected_batches: rejected,
        rejection_rate: round2(percentage(rejected, total)),
        rejection_by_type: by_type,
        most_common_rejection: most_common
            .map(|(_, name)| name)
            .unwrap_or_else(|| NO_REJECTION.to_string()),
    }
}
