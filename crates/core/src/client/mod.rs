//! Client for a remote batch quality analysis API.
//!
//! Used by dashboards and `aac fetch` to read mould performance from another
//! plant's server.

pub mod error;

pub use error::{ClientError, ClientResult};

use aac_protocol::analytics_models::MouldPerformance;
use chrono::NaiveDate;

/// Path of the mould performance endpoint, relative to the API base URL.
pub const MOULD_PERFORMANCE_PATH: &str = "/api/mould-performance";

/// How alarming a rejection rate is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateBand {
    /// Up to 10%.
    Good,
    /// Above 10%.
    Elevated,
    /// Above 30%.
    High,
    /// Above 50%.
    Critical,
}

impl RateBand {
    pub fn of(rejection_rate: f64) -> Self {
        if rejection_rate > 50.0 {
            RateBand::Critical
        } else if rejection_rate > 30.0 {
            RateBand::High
        } else if rejection_rate > 10.0 {
            RateBand::Elevated
        } else {
            RateBand::Good
        }
    }
}

/// HTTP client for the analysis API at `base_url`.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    base_url: String,
    http: reqwest::Client,
}

impl AnalysisClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches per-mould rejection rates for batches dated between `start`
    /// and `end`.
    ///
    /// A 404 means no batch matched and yields an empty list.
    ///
    /// # Errors
    ///
    /// - `ClientError::Http` if the server cannot be reached
    /// - `ClientError::Status` for any other non-success status
    /// - `ClientError::Decode` if the body is not a mould performance list
    pub async fn mould_performance(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> ClientResult<Vec<MouldPerformance>> {
        let url = format!("{}{}", self.base_url, MOULD_PERFORMANCE_PATH);
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(start) = start {
            params.push(("start_date", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = end {
            params.push(("end_date", end.format("%Y-%m-%d").to_string()));
        }

        tracing::debug!(url = %url, ?start, ?end, "fetching mould performance");
        let resp = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|source| ClientError::Http {
                url: url.clone(),
                source,
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !resp.status().is_success() {
            tracing::warn!(url = %url, status = resp.status().as_u16(), "analysis API error");
            return Err(ClientError::Status {
                status: resp.status().as_u16(),
            });
        }

        resp.json::<Vec<MouldPerformance>>()
            .await
            .map_err(ClientError::Decode)
    }
}
