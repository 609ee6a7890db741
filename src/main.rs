// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

use crate::application::prediction_service::PredictionService;
use crate::application::site_history_repository::SiteHistoryRepository;
use crate::application::site_service::SiteService;
use crate::domain::parameter::validate_weight_table;
use crate::infrastructure::config::{load_influx_config, load_prediction_config};
use crate::infrastructure::influx_repository::InfluxRepository;
use crate::infrastructure::json_model_store::JsonModelStore;
use crate::presentation::app_state::AppState;
use crate::presentation::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    validate_weight_table()?;

    // Load configuration
    let influx_config = load_influx_config()?;
    let prediction_config = load_prediction_config()?.prediction;

    // Create stores (infrastructure layer)
    let models = Arc::new(JsonModelStore::open(&prediction_config.model_path)?);
    let history: Arc<dyn SiteHistoryRepository> =
        Arc::new(InfluxRepository::new(influx_config.influx)?);

    // Create services (application layer)
    let prediction_service =
        PredictionService::new(models, history.clone(), prediction_config.horizon_days);
    let site_service = SiteService::new(history, prediction_config.listing_limit);

    let state = Arc::new(AppState {
        prediction_service,
        site_service,
    });

    // Start server (presentation layer)
    let addr: SocketAddr = prediction_config.bind_address.parse()?;
    tracing::info!("Starting watersafe-forecast service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;

    Ok(())
}
