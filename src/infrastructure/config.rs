use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

const ENV_PREFIX: &str = "WATERSAFE";

#[derive(Debug, Deserialize, Clone)]
pub struct InfluxConfig {
    pub influx: InfluxSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InfluxSettings {
    pub host: String,
    pub token: String,
    pub database: String,
    pub retention_policy: String,
    #[serde(default = "default_measurement")]
    pub measurement: String,
    /// Upper bound on any single history query
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictionConfig {
    #[serde(default)]
    pub prediction: PredictionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictionSettings {
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Days between today and the date a prediction is labelled with
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u64,
    #[serde(default = "default_listing_limit")]
    pub listing_limit: usize,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            horizon_days: default_horizon_days(),
            listing_limit: default_listing_limit(),
            bind_address: default_bind_address(),
        }
    }
}

fn default_measurement() -> String {
    "site_readings".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_model_path() -> PathBuf {
    PathBuf::from("model/site_model_params_1Month.json")
}

fn default_horizon_days() -> u64 {
    30
}

fn default_listing_limit() -> usize {
    50
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

pub fn load_influx_config() -> anyhow::Result<InfluxConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/influx"))
        .add_source(environment())
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_prediction_config() -> anyhow::Result<PredictionConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/prediction").required(false))
        .add_source(environment())
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace template variables in a query string
pub fn prepare_query(query: &str, vars: &HashMap<String, String>) -> String {
    let mut result = query.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}
