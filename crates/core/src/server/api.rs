use std::sync::Arc;

use aac_protocol::analytics_models::{
    AnalysisQuery, ApiMessage, BatchQualityStats, MouldPerformance, RejectionTrend,
};
use aac_protocol::batch_models::{BatchRecord, BatchStatus};
use aac_protocol::stage_models::{BatchStages, BatchSummary};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::analytics;
use crate::state::StateManager;

/// Banner returned by `GET /`.
pub const API_TITLE: &str = "AAC Plant Batch Quality Analysis API";

// ── Shared application state ──────────────────────────────────────────

pub struct AppState {
    pub manager: StateManager,
    pub plant_name: String,
}

pub type SharedState = Arc<AppState>;

// ── Request and response payloads ─────────────────────────────────────

#[derive(Deserialize)]
pub struct BatchListQuery {
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub plant: String,
    pub batches: usize,
    pub autoclaves: usize,
}

// ── Router ────────────────────────────────────────────────────────────

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/batch-quality", get(batch_quality))
        .route("/api/rejection-trends", get(rejection_trends))
        .route("/api/mould-performance", get(mould_performance))
        .route("/api/batches", get(list_batches))
        .route("/api/batches/{id}", get(get_batch))
        .route("/api/batches/{id}/stages", get(get_batch_stages))
}

// ── Handlers ──────────────────────────────────────────────────────────

async fn root() -> Json<ApiMessage> {
    Json(ApiMessage {
        message: API_TITLE.to_string(),
    })
}

async fn health(State(state): State<SharedState>) -> Json<HealthStatus> {
    let (batches, autoclaves) = state
        .manager
        .read(|store| (store.batches().len(), store.autoclaves().len()))
        .await;
    Json(HealthStatus {
        status: "ok".to_string(),
        plant: state.plant_name.clone(),
        batches,
        autoclaves,
    })
}

async fn batch_quality(
    State(state): State<SharedState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<BatchQualityStats>, ApiError> {
    let stats = state
        .manager
        .read(|store| analytics::quality_report(store.batches(), &query))
        .await?;
    Ok(Json(stats))
}

async fn rejection_trends(
    State(state): State<SharedState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<Vec<RejectionTrend>>, ApiError> {
    let trends = state
        .manager
        .read(|store| analytics::trends_report(store.batches(), &query))
        .await?;
    Ok(Json(trends))
}

async fn mould_performance(
    State(state): State<SharedState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<Vec<MouldPerformance>>, ApiError> {
    let moulds = state
        .manager
        .read(|store| analytics::mould_report(store.batches(), &query))
        .await?;
    Ok(Json(moulds))
}

async fn list_batches(
    State(state): State<SharedState>,
    Query(query): Query<BatchListQuery>,
) -> Result<Json<Vec<BatchSummary>>, ApiError> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(raw.parse::<BatchStatus>().map_err(|_| {
            ApiError::BadRequest(
                "Invalid status parameter. Use pending, in-progress, or completed".into(),
            )
        })?),
        None => None,
    };

    let summaries = state
        .manager
        .read(|store| {
            store
                .summaries()
                .into_iter()
                .filter(|summary| status.map_or(true, |s| summary.status == s.as_slug()))
                .collect::<Vec<_>>()
        })
        .await;
    Ok(Json(summaries))
}

async fn get_batch(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<BatchRecord>, ApiError> {
    state
        .manager
        .read(|store| store.batch(&id).cloned())
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Batch {} not found", id)))
}

async fn get_batch_stages(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<BatchStages>, ApiError> {
    state
        .manager
        .read(|store| store.stages_for(&id))
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Batch {} not found", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::builder::new_batch;
    use crate::state::BatchStore;
    use aac_protocol::batch_models::CuttingMark;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use http_body_util::BodyExt;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let now = Utc
            .with_ymd_and_hms(2025, 4, 9, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        let mut store = BatchStore::new();
        let mut rejected = new_batch("1511", "M2", now);
        rejected.process_steps.cutting.chipping_rejection = Some(CuttingMark::Count(2.0));
        store.add_batch(rejected).expect("add batch");
        store.add_batch(new_batch("1520", "M4", now)).expect("add batch");
        store.update_batch_status("1520", BatchStatus::Pending);

        let (tx, _rx) = mpsc::channel(16);
        let state = Arc::new(AppState {
            manager: StateManager::new(store, tx),
            plant_name: "Test Plant".to_string(),
        });
        api_router().with_state(state)
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request");
        let resp = test_app().oneshot(req).await.expect("router response");
        let status = resp.status();
        let bytes = resp
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let json = serde_json::from_slice(&bytes).expect("JSON body");
        (status, json)
    }

    #[tokio::test]
    async fn test_root_banner() {
        let (status, body) = get_json("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], API_TITLE);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["plant"], "Test Plant");
        assert_eq!(body["batches"], 2);
    }

    #[tokio::test]
    async fn test_batch_quality() {
        let (status, body) = get_json("/api/batch-quality").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_batches"], 2);
        assert_eq!(body["rejected_batches"], 1);
        assert_eq!(body["rejection_rate"], 50.0);
        assert_eq!(body["most_common_rejection"], "Chipping");
    }

    #[tokio::test]
    async fn test_batch_quality_invalid_date() {
        let (status, body) = get_json("/api/batch-quality?start_date=04-09-2025").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid start_date format. Use YYYY-MM-DD");
    }

    #[tokio::test]
    async fn test_no_batches_is_not_found() {
        let (status, body) = get_json("/api/mould-performance?start_date=2030-01-01").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "No batches found matching the criteria");
    }

    #[tokio::test]
    async fn test_rejection_trends_field_names() {
        let (status, body) = get_json("/api/rejection-trends?group_by=month").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["Period"], "2025-04-01");
        assert_eq!(body[0]["TotalBatches"], 2);
        assert_eq!(body[0]["ChippingRate"], 50.0);

        let (status, body) = get_json("/api/rejection-trends?group_by=year").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid group_by parameter. Use day, week, or month");
    }

    #[tokio::test]
    async fn test_mould_performance() {
        let (status, body) = get_json("/api/mould-performance").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["MouldId"], "M2");
        assert_eq!(body[0]["RejectionRate"], 100.0);
        assert_eq!(body[1]["MouldId"], "M4");
    }

    #[tokio::test]
    async fn test_list_batches_by_status() {
        let (status, body) = get_json("/api/batches?status=pending").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(1));
        assert_eq!(body[0]["batchNumber"], "1520");
        assert_eq!(body[0]["stages"]["batching"], "pending");

        let (status, _) = get_json("/api/batches?status=lost").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_batch_and_stages() {
        let (status, body) = get_json("/api/batches/1511").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mouldId"], "M2");
        assert_eq!(body["status"], "In Progress");

        let (status, body) = get_json("/api/batches/1511/stages").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["batching"], "in-progress");
        assert_eq!(body["ferryCart"], "pending");

        let (status, body) = get_json("/api/batches/9999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Batch 9999 not found");
    }
}
