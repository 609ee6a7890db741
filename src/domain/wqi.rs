// Water Quality Index scoring
use super::parameter::{total_weight, Parameter, Standard};
use super::reading::PredictedParameters;

pub const MAX_SCORE: f64 = 100.0;
pub const MIN_SCORE: f64 = 0.0;

/// Scores a single value against its standard, from 0 (worst) to 100 (best).
///
/// Banded standards are pass/fail. Ceilings lose score linearly and reach 0 at
/// the ceiling. NaN scores 0.
pub fn calculate_score(value: f64, standard: Standard) -> f64 {
    if value.is_nan() {
        return MIN_SCORE;
    }

    let score = match standard {
        Standard::Band { low, high } => {
            if (low..=high).contains(&value) {
                MAX_SCORE
            } else {
                MIN_SCORE
            }
        }
        Standard::Ceiling(limit) => MAX_SCORE - (value / limit * MAX_SCORE),
    };

    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// Weighted index over the given parameter values.
///
/// The weighted sum is divided by the weight of the whole table, so a
/// parameter left out counts as a zero score. No values gives 0.
pub fn calculate_wqi<I>(values: I) -> f64
where
    I: IntoIterator<Item = (Parameter, f64)>,
{
    let mut contributed = false;
    let weighted: f64 = values
        .into_iter()
        .map(|(parameter, value)| {
            contributed = true;
            calculate_score(value, parameter.standard()) * parameter.weight()
        })
        .sum();

    let total = total_weight();
    if !contributed || total <= 0.0 {
        return MIN_SCORE;
    }

    (weighted / total).clamp(MIN_SCORE, MAX_SCORE)
}

/// Index for a full set of predicted parameters.
pub fn score(predicted: &PredictedParameters) -> f64 {
    calculate_wqi(predicted.iter())
}

/// Rounds to two decimal places for reporting.
pub fn round_score(wqi: f64) -> f64 {
    (wqi * 100.0).round() / 100.0
}
