// Human-readable guidance from a risk level and predicted chemistry
use super::parameter::{Parameter, Standard};
use super::reading::PredictedParameters;
use super::risk::RiskLevel;

const SAFE_ADVICE: [&str; 3] = [
    "Water quality is safe for drinking",
    "Continue regular monitoring",
    "No immediate action required",
];

const MODERATE_ADVICE: [&str; 3] = [
    "Water quality is acceptable but monitor closely",
    "Consider using a water filter for better taste",
    "Increase monitoring frequency",
];

const UNSAFE_ADVICE: [&str; 3] = [
    "Water quality requires attention",
    "Consider alternative water sources",
    "Immediate testing and treatment recommended",
];

pub const PH_ADVICE: &str = "pH level outside optimal range - consider pH adjustment";
pub const SALINITY_ADVICE: &str = "High salinity detected - consider desalination";
pub const CHLORIDE_ADVICE: &str = "High chloride content - may affect taste and corrosion";

/// Three lines for the risk level, then one line per parameter out of
/// range, in the order pH, salinity, chloride.
pub fn recommend(risk: RiskLevel, predicted: &PredictedParameters) -> Vec<String> {
    let base = match risk {
        RiskLevel::Safe => SAFE_ADVICE,
        RiskLevel::Moderate => MODERATE_ADVICE,
        RiskLevel::Unsafe => UNSAFE_ADVICE,
    };
    let mut recommendations: Vec<String> = base.iter().map(|s| s.to_string()).collect();

    if outside_standard(Parameter::Ph, predicted) {
        recommendations.push(PH_ADVICE.to_string());
    }
    if outside_standard(Parameter::Salinity, predicted) {
        recommendations.push(SALINITY_ADVICE.to_string());
    }
    if outside_standard(Parameter::Chloride, predicted) {
        recommendations.push(CHLORIDE_ADVICE.to_string());
    }

    recommendations
}

fn outside_standard(parameter: Parameter, predicted: &PredictedParameters) -> bool {
    let value = predicted.get(parameter);
    match parameter.standard() {
        Standard::Band { low, high } => value < low || value > high,
        Standard::Ceiling(limit) => value > limit,
    }
}
