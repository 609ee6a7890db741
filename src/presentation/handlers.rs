// HTTP request handlers
use crate::application::prediction_service::HealthReport;
use crate::application::site_service::SiteEntry;
use crate::domain::prediction::PredictionResult;
use crate::domain::site::{SiteLocation, SuburbSummary};
use crate::presentation::app_state::AppState;
use crate::presentation::error_response::ApiError;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct PredictionRequest {
    pub site_id: String,
}

#[derive(Deserialize)]
pub struct SuburbSearchRequest {
    pub suburb_name: String,
}

#[derive(Serialize)]
pub struct SitesResponse {
    pub total_sites: usize,
    pub sites: Vec<SiteEntry>,
    pub message: String,
}

#[derive(Serialize)]
pub struct SuburbsResponse {
    pub total_suburbs: usize,
    pub suburbs: Vec<SuburbSummary>,
    pub message: String,
}

#[derive(Serialize)]
pub struct SuburbSearchResponse {
    pub suburb_name: String,
    pub total_sites: usize,
    pub sites: Vec<SiteLocation>,
    pub message: String,
}

#[derive(Serialize)]
pub struct ReloadResponse {
    pub total_sites_in_model: usize,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Forecast water quality for one site
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<PredictionResult>, ApiError> {
    let result = state
        .prediction_service
        .predict_for_site(&request.site_id)
        .await?;
    Ok(Json(result))
}

pub async fn list_sites(State(state): State<Arc<AppState>>) -> Result<Json<SitesResponse>, ApiError> {
    let page = state
        .site_service
        .list_sites()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to load sites: {}", e)))?;

    Ok(Json(SitesResponse {
        total_sites: page.total,
        message: format!("Showing first {} sites out of {} total", page.items.len(), page.total),
        sites: page.items,
    }))
}

pub async fn list_suburbs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuburbsResponse>, ApiError> {
    let page = state
        .site_service
        .list_suburbs()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to load suburbs: {}", e)))?;

    Ok(Json(SuburbsResponse {
        total_suburbs: page.total,
        message: format!("Showing first {} suburbs out of {} total", page.items.len(), page.total),
        suburbs: page.items,
    }))
}

pub async fn search_by_suburb(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SuburbSearchRequest>,
) -> Result<Json<SuburbSearchResponse>, ApiError> {
    let sites = state
        .site_service
        .search_by_suburb(&request.suburb_name)
        .await
        .map_err(|e| ApiError::internal(format!("Search failed: {}", e)))?;

    let message = if sites.is_empty() {
        format!("No sites found for suburb '{}'", request.suburb_name)
    } else {
        format!("Found {} sites for suburb '{}'", sites.len(), request.suburb_name)
    };

    Ok(Json(SuburbSearchResponse {
        suburb_name: request.suburb_name,
        total_sites: sites.len(),
        sites,
        message,
    }))
}

/// Model store and history store status; always answers 200
pub async fn prediction_health(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    Json(state.prediction_service.health().await)
}

pub async fn reload_models(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReloadResponse>, ApiError> {
    let total_sites_in_model = state.prediction_service.reload_models()?;
    Ok(Json(ReloadResponse { total_sites_in_model }))
}
