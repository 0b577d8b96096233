//! Payloads of the batch quality analysis API.
//!
//! Field names match what dashboard clients already consume, which is why
//! some structs are PascalCase and others snake_case.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Rejection statistics for a single mould.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "PascalCase")]
pub struct MouldPerformance {
    pub mould_id: String,
    pub total_batches: u32,
    pub rejected_batches: u32,
    /// Percentage, rounded to two decimals.
    pub rejection_rate: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct RejectionSummary {
    pub rejection_type: String,
    pub count: u32,
    pub percentage: f64,
}

/// Response of `GET /api/batch-quality`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct BatchQualityStats {
    pub total_batches: u32,
    pub rejected_batches: u32,
    pub rejection_rate: f64,
    pub rejection_by_type: Vec<RejectionSummary>,
    /// Readable name of the most frequent rejection type, or `"None"`.
    pub most_common_rejection: String,
}

/// One period row of `GET /api/rejection-trends`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "PascalCase")]
pub struct RejectionTrend {
    /// Start date of the period, `YYYY-MM-DD`.
    pub period: String,
    pub total_batches: u32,
    pub rejected_batches: u32,
    pub rejection_rate: f64,

    pub tilting_crane_rejections: u32,
    pub chipping_rejections: u32,
    pub side_cutter_rejections: u32,
    pub joined_rejections: u32,
    pub trimming_rejections: u32,
    #[serde(rename = "RejectedDueToHC")]
    pub rejected_due_to_hc: u32,
    #[serde(rename = "RejectedDueToVC")]
    pub rejected_due_to_vc: u32,

    pub tilting_crane_rate: f64,
    pub chipping_rate: f64,
    pub side_cutter_rate: f64,
    pub joined_rate: f64,
    pub trimming_rate: f64,
    #[serde(rename = "HCRate")]
    pub hc_rate: f64,
    #[serde(rename = "VCRate")]
    pub vc_rate: f64,
}

/// Period granularity of rejection trends.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Day,
    /// Weeks start on Monday.
    Week,
    /// Months start on the 1st.
    Month,
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GroupBy::Day => "day",
            GroupBy::Week => "week",
            GroupBy::Month => "month",
        })
    }
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(GroupBy::Day),
            "week" => Ok(GroupBy::Week),
            "month" => Ok(GroupBy::Month),
            _ => Err("Invalid group_by parameter. Use day, week, or month".to_string()),
        }
    }
}

/// Query parameters shared by the analysis endpoints.
///
/// Dates are kept as the raw `YYYY-MM-DD` strings so that malformed input can
/// be reported with the offending parameter's name.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
pub struct AnalysisQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub mould_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub group_by: Option<String>,
}

/// JSON body of every error response from the analysis API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct ApiMessage {
    pub message: String,
}
