// Application state for HTTP handlers
use crate::application::prediction_service::PredictionService;
use crate::application::site_service::SiteService;

#[derive(Clone)]
pub struct AppState {
    pub prediction_service: PredictionService,
    pub site_service: SiteService,
}
