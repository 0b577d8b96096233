//! HTTP error responses.

use crate::analytics::AnalyticsError;
use aac_protocol::analytics_models::ApiMessage;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// An error returned to API clients as `{"message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg,
        };
        if status.is_server_error() {
            tracing::error!(%status, message = %message, "request failed");
        }
        (status, Json(ApiMessage { message })).into_response()
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::NoBatches => ApiError::NotFound(err.to_string()),
            AnalyticsError::InvalidDate { .. } | AnalyticsError::InvalidGroupBy => {
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}
