// Next-period forecasting of individual parameters
use super::parameter::Parameter;
use super::reading::{HistoricalReading, PredictedParameters};
use super::site_model::{ForecastRule, SiteModel};

/// Value used when nothing can be forecast for a parameter.
pub const NO_FORECAST: f64 = 0.0;

/// Forecasts one parameter from `history`, which must be ordered oldest first.
pub fn predict(parameter: Parameter, rule: Option<ForecastRule>, history: &[HistoricalReading]) -> f64 {
    match rule {
        // `n` counts every row, including rows where this parameter is null.
        // The coefficients were fitted against that row index, so it is kept
        // as-is even though it looks like it should be a per-parameter count.
        Some(ForecastRule::LinearRegression { slope, intercept }) => {
            let n = history.len() as f64;
            slope * n + intercept
        }
        Some(ForecastRule::RepeatLast) => history
            .iter()
            .rev()
            .find_map(|reading| reading.get(parameter))
            .unwrap_or(NO_FORECAST),
        None => NO_FORECAST,
    }
}

/// Forecasts every parameter for a site.
pub fn predict_all(model: &SiteModel, history: &[HistoricalReading]) -> PredictedParameters {
    Parameter::ALL
        .into_iter()
        .map(|p| (p, predict(p, model.rule(p), history)))
        .collect()
}
