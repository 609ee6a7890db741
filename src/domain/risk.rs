// Risk classification from the Water Quality Index
use serde::Serialize;
use std::fmt;

pub const SAFE_THRESHOLD: f64 = 70.0;
pub const MODERATE_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Safe,     // >= 70
    Moderate, // 50-70
    Unsafe,   // < 50
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "Safe",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::Unsafe => "Unsafe",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Each band includes its lower bound.
pub fn classify(wqi: f64) -> RiskLevel {
    if wqi >= SAFE_THRESHOLD {
        RiskLevel::Safe
    } else if wqi >= MODERATE_THRESHOLD {
        RiskLevel::Moderate
    } else {
        RiskLevel::Unsafe
    }
}
