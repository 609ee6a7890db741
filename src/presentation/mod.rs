// Presentation layer - HTTP routes over the application services
pub mod app_state;
pub mod error_response;
pub mod handlers;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    health_check, list_sites, list_suburbs, predict, prediction_health, reload_models,
    search_by_suburb,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/health", get(prediction_health))
        .route("/predict", post(predict))
        .route("/sites", get(list_sites))
        .route("/suburbs", get(list_suburbs))
        .route("/search-by-suburb", post(search_by_suburb))
        .route("/models/reload", post(reload_models))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
