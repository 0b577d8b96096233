//! Rejection rates per mould.

use crate::analytics::rejections::{has_rejections, percentage, round2};
use aac_protocol::analytics_models::MouldPerformance;
use aac_protocol::batch_models::BatchRecord;
use std::collections::BTreeMap;

/// Batch and rejection counts per mould, worst rejection rate first.
///
/// Moulds with equal rates are ordered by mould ID.
pub fn mould_performance(batches: &[&BatchRecord]) -> Vec<MouldPerformance> {
    let mut moulds: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
    for batch in batches {
        let (total, rejected) = moulds.entry(batch.mould_id.as_str()).or_default();
        *total += 1;
        if has_rejections(batch) {
            *rejected += 1;
        }
    }

    let mut rows: Vec<(f64, MouldPerformance)> = moulds
        .into_iter()
        .map(|(mould_id, (total, rejected))| {
            let rate = percentage(rejected, total);
            let row = MouldPerformance {
                mould_id: mould_id.to_string(),
                total_batches: total,
                rejected_batches: rejected,
                rejection_rate: round2(rate),
            };
            (rate, row)
        })
        .collect();
    rows.sort_by(|(a, _), (b, _)| b.total_cmp(a));

    rows.into_iter().map(|(_, row)| row).collect()
}
