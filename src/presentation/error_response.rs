// Mapping of service failures onto HTTP responses
use crate::domain::error::{ModelStoreError, PredictionError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        let status = match &err {
            // Client-facing: a typo in the id, or a site that needs backfilling
            PredictionError::SiteNotFound { .. } | PredictionError::NoHistoricalData { .. } => {
                StatusCode::NOT_FOUND
            }
            PredictionError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            PredictionError::DataSource(_) => StatusCode::BAD_GATEWAY,
        };

        if status.is_server_error() {
            tracing::error!("Prediction failed: {}", err);
        }

        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl From<ModelStoreError> for ApiError {
    fn from(err: ModelStoreError) -> Self {
        tracing::error!("Model store error: {}", err);
        Self::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}
