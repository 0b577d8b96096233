//! Rejection trends per day, week or month.

use crate::analytics::rejections::{has_rejections, percentage, round2, RejectionField};
use aac_protocol::analytics_models::{GroupBy, RejectionTrend};
use aac_protocol::batch_models::BatchRecord;
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

/// First day of the period containing `date`.
pub fn period_start(date: NaiveDate, group_by: GroupBy) -> NaiveDate {
    match group_by {
        GroupBy::Day => date,
        GroupBy::Week => date - Duration::days(i64::from(date.weekday().num_days_from_monday())),
        GroupBy::Month => date.with_day(1).unwrap_or(date),
    }
}

#[derive(Default)]
struct PeriodTally {
    total: u32,
    rejected: u32,
    by_field: [u32; 7],
}

impl PeriodTally {
    fn add(&mut self, batch: &BatchRecord) {
        self.total += 1;
        if has_rejections(batch) {
            self.rejected += 1;
        }
        for (slot, field) in self
            .by_field
            .iter_mut()
            .zip(RejectionField::BATCH_REJECTING)
        {
            if field.is_set(batch) {
                *slot += 1;
            }
        }
    }

    fn into_trend(self, period: NaiveDate) -> RejectionTrend {
        let [tilting, chipping, side_cutter, joined, trimming, hc, vc] = self.by_field;
        let rate = |count| round2(percentage(count, self.total));

        RejectionTrend {
            period: period.format("%Y-%m-%d").to_string(),
            total_batches: self.total,
            rejected_batches: self.rejected,
            rejection_rate: rate(self.rejected),
            tilting_crane_rejections: tilting,
            chipping_rejections: chipping,
            side_cutter_rejections: side_cutter,
            joined_rejections: joined,
            trimming_rejections: trimming,
            rejected_due_to_hc: hc,
            rejected_due_to_vc: vc,
            tilting_crane_rate: rate(tilting),
            chipping_rate: rate(chipping),
            side_cutter_rate: rate(side_cutter),
            joined_rate: rate(joined),
            trimming_rate: rate(trimming),
            hc_rate: rate(hc),
            vc_rate: rate(vc),
        }
    }
}

/// Per-period rejection counts and rates over `batches`, oldest period first.
pub fn rejection_trends(batches: &[&BatchRecord], group_by: GroupBy) -> Vec<RejectionTrend> {
    let mut periods: BTreeMap<NaiveDate, PeriodTally> = BTreeMap::new();
    for batch in batches {
        periods
            .entry(period_start(batch.date, group_by))
            .or_default()
            .add(batch);
    }

    periods
        .into_iter()
        .map(|(period, tally)| tally.into_trend(period))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::builder::new_batch;
    use aac_protocol::batch_models::CuttingMark;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn batch_on(number: &str, day: NaiveDate) -> BatchRecord {
        let now = Utc
            .with_ymd_and_hms(day.year(), day.month(), day.day(), 9, 0, 0)
            .single()
            .expect("valid timestamp");
        new_batch(number, "M4", now)
    }

    #[test]
    fn test_period_start() {
        // 2025-04-09 is a Wednesday
        let wednesday = date(2025, 4, 9);
        assert_eq!(period_start(wednesday, GroupBy::Day), wednesday);
        assert_eq!(period_start(wednesday, GroupBy::Week), date(2025, 4, 7));
        assert_eq!(period_start(date(2025, 4, 13), GroupBy::Week), date(2025, 4, 7));
        assert_eq!(period_start(date(2025, 4, 7), GroupBy::Week), date(2025, 4, 7));
        assert_eq!(period_start(wednesday, GroupBy::Month), date(2025, 4, 1));
    }

    #[test]
    fn test_daily_trends() {
        let mut a = batch_on("1", date(2025, 4, 9));
        a.process_steps.cutting.chipping_rejection = Some(CuttingMark::Count(3.0));
        a.process_steps.cutting.rejected_due_to_hc = Some(CuttingMark::Count(1.0));
        let b = batch_on("2", date(2025, 4, 9));
        let c = batch_on("3", date(2025, 4, 8));

        let trends = rejection_trends(&[&a, &b, &c], GroupBy::Day);

        assert_eq!(trends.len(), 2);
        assert_eq!(trends[0].period, "2025-04-08");
        assert_eq!(trends[0].total_batches, 1);
        assert_eq!(trends[0].rejection_rate, 0.0);

        let day = &trends[1];
        assert_eq!(day.period, "2025-04-09");
        assert_eq!(day.total_batches, 2);
        assert_eq!(day.rejected_batches, 1);
        assert_eq!(day.rejection_rate, 50.0);
        assert_eq!(day.chipping_rejections, 1);
        assert_eq!(day.chipping_rate, 50.0);
        assert_eq!(day.rejected_due_to_hc, 1);
        assert_eq!(day.hc_rate, 50.0);
        assert_eq!(day.vc_rate, 0.0);
    }

    #[test]
    fn test_weekly_and_monthly_grouping() {
        let batches = [
            batch_on("1", date(2025, 3, 31)),
            batch_on("2", date(2025, 4, 6)),
            batch_on("3", date(2025, 4, 7)),
        ];
        let refs: Vec<&BatchRecord> = batches.iter().collect();

        let weeks: Vec<(String, u32)> = rejection_trends(&refs, GroupBy::Week)
            .into_iter()
            .map(|t| (t.period, t.total_batches))
            .collect();
        assert_eq!(
            weeks,
            vec![("2025-03-31".to_string(), 2), ("2025-04-07".to_string(), 1)]
        );

        let months: Vec<(String, u32)> = rejection_trends(&refs, GroupBy::Month)
            .into_iter()
            .map(|t| (t.period, t.total_batches))
            .collect();
        assert_eq!(
            months,
            vec![("2025-03-01".to_string(), 1), ("2025-04-01".to_string(), 2)]
        );
    }

    #[test]
    fn test_broken_wires_are_not_trended() {
        let mut a = batch_on("1", date(2025, 4, 9));
        a.process_steps.cutting.wire_broken_vc = Some(CuttingMark::Count(1.0));

        let trends = rejection_trends(&[&a], GroupBy::Day);
        assert_eq!(trends[0].rejected_batches, 0);
    }
}
