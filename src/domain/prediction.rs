// Site-level prediction result
use chrono::NaiveDate;
use serde::Serialize;

use super::reading::PredictedParameters;
use super::risk::RiskLevel;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub site_id: String,
    /// Serialized as `YYYY-MM-DD`.
    pub prediction_date: NaiveDate,
    pub parameters: PredictedParameters,
    /// Rounded to two decimal places.
    pub wqi_score: f64,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parameter::Parameter;

    #[test]
    fn test_serializes_as_flat_record() {
        let result = PredictionResult {
            site_id: "site_001".to_string(),
            prediction_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            parameters: [(Parameter::Ph, 7.2)].into_iter().collect(),
            wqi_score: 85.5,
            risk_level: RiskLevel::Safe,
            recommendations: vec!["Water quality is safe for drinking".to_string()],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["site_id"], "site_001");
        assert_eq!(json["prediction_date"], "2024-01-15");
        assert_eq!(json["parameters"]["pH"], 7.2);
        assert_eq!(json["wqi_score"], 85.5);
        assert_eq!(json["risk_level"], "Safe");
        assert_eq!(json["recommendations"][0], "Water quality is safe for drinking");
    }
}
