// Error taxonomy for the prediction pipeline
use std::path::PathBuf;
use thiserror::Error;

use super::parameter::Parameter;
use super::site::SiteSuggestions;

#[derive(Debug, Error)]
pub enum WeightTableError {
    #[error("weight for {parameter} is {weight}, expected a value in [0, 1]")]
    OutOfRange { parameter: Parameter, weight: f64 },

    #[error("parameter weights sum to {total}, expected 1")]
    BadSum { total: f64 },
}

/// The model parameter store could not be read or did not parse.
#[derive(Debug, Error)]
pub enum ModelStoreError {
    #[error("cannot read model parameters from {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model parameters file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("site {site_id}, parameter {parameter}: {reason}")]
    InvalidRule {
        site_id: String,
        parameter: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("model parameter store unavailable: {0}")]
    Configuration(#[from] ModelStoreError),

    #[error("site history unavailable: {0}")]
    DataSource(#[source] anyhow::Error),

    #[error("Site ID '{site_id}' not found. {suggestions}")]
    SiteNotFound {
        site_id: String,
        suggestions: SiteSuggestions,
    },

    #[error("No historical data found for site '{site_id}'")]
    NoHistoricalData { site_id: String },
}
