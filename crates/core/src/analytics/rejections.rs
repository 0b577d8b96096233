//! Cutting-stage rejection causes.

use aac_protocol::batch_models::{BatchRecord, CuttingData, CuttingMark};

/// A rejection counter recorded at the cutting stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionField {
    TiltingCrane,
    Chipping,
    SideCutter,
    Joined,
    Trimming,
    WireBrokenHc,
    WireBrokenVc,
    RejectedDueToHc,
    RejectedDueToVc,
}

impl RejectionField {
    /// Every counter, in reporting order.
    pub const ALL: [RejectionField; 9] = [
        RejectionField::TiltingCrane,
        RejectionField::Chipping,
        RejectionField::SideCutter,
        RejectionField::Joined,
        RejectionField::Trimming,
        RejectionField::WireBrokenHc,
        RejectionField::WireBrokenVc,
        RejectionField::RejectedDueToHc,
        RejectionField::RejectedDueToVc,
    ];

    /// Counters that make a batch count as rejected. Broken wires are
    /// tallied but do not reject a batch on their own.
    pub const BATCH_REJECTING: [RejectionField; 7] = [
        RejectionField::TiltingCrane,
        RejectionField::Chipping,
        RejectionField::SideCutter,
        RejectionField::Joined,
        RejectionField::Trimming,
        RejectionField::RejectedDueToHc,
        RejectionField::RejectedDueToVc,
    ];

    /// Field name as stored on the cutting record.
    pub fn key(self) -> &'static str {
        match self {
            RejectionField::TiltingCrane => "tiltingCraneRejection",
            RejectionField::Chipping => "chippingRejection",
            RejectionField::SideCutter => "sideCutterRejection",
            RejectionField::Joined => "joinedRejection",
            RejectionField::Trimming => "trimmingRejection",
            RejectionField::WireBrokenHc => "wireBrokenHC",
            RejectionField::WireBrokenVc => "wireBrokenVC",
            RejectionField::RejectedDueToHc => "rejectedDueToHC",
            RejectionField::RejectedDueToVc => "rejectedDueToVC",
        }
    }

    /// Name shown in quality reports, e.g. `Tiltingcrane` or `Rejected Tohc`.
    pub fn readable_name(self) -> String {
        readable_name(self.key())
    }

    fn mark(self, cutting: &CuttingData) -> Option<&CuttingMark> {
        match self {
            RejectionField::TiltingCrane => cutting.tilting_crane_rejection.as_ref(),
            RejectionField::Chipping => cutting.chipping_rejection.as_ref(),
            RejectionField::SideCutter => cutting.side_cutter_rejection.as_ref(),
            RejectionField::Joined => cutting.joined_rejection.as_ref(),
            RejectionField::Trimming => cutting.trimming_rejection.as_ref(),
            RejectionField::WireBrokenHc => cutting.wire_broken_hc.as_ref(),
            RejectionField::WireBrokenVc => cutting.wire_broken_vc.as_ref(),
            RejectionField::RejectedDueToHc => cutting.rejected_due_to_hc.as_ref(),
            RejectionField::RejectedDueToVc => cutting.rejected_due_to_vc.as_ref(),
        }
    }

    /// Whether `batch` records a rejection for this counter.
    pub fn is_set(self, batch: &BatchRecord) -> bool {
        self.mark(&batch.process_steps.cutting)
            .is_some_and(CuttingMark::is_rejection)
    }
}

/// Whether any batch-rejecting counter of `batch` is set.
pub fn has_rejections(batch: &BatchRecord) -> bool {
    RejectionField::BATCH_REJECTING
        .iter()
        .any(|field| field.is_set(batch))
}

/// Number of batches with each counter set, in [`RejectionField::ALL`] order.
pub fn rejection_counts(batches: &[&BatchRecord]) -> Vec<(RejectionField, u32)> {
    RejectionField::ALL
        .iter()
        .map(|&field| {
            let count = batches.iter().filter(|batch| field.is_set(batch)).count();
            (field, u32::try_from(count).unwrap_or(u32::MAX))
        })
        .collect()
}

/// Drops `Rejection`, splits on `Due` and capitalizes each part with the
/// rest lowercased.
fn readable_name(key: &str) -> String {
    key.replace("Rejection", "")
        .split("Due")
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Rounds a percentage to two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part` as a percentage of `whole`, or `0` when `whole` is zero.
pub(crate) fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole) * 100.0
    }
}
