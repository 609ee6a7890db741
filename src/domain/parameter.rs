// Water chemistry parameters and their drinking-water standards
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::WeightTableError;

/// The fixed set of parameters a site is forecast and scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Parameter {
    #[serde(rename = "Chloride as Cl")]
    Chloride,
    #[serde(rename = "Calcium (Total)")]
    Calcium,
    #[serde(rename = "Total Magnesium")]
    Magnesium,
    #[serde(rename = "Sodium as Na")]
    Sodium,
    #[serde(rename = "Potassium as K")]
    Potassium,
    #[serde(rename = "Salinity as EC@25 (lab)")]
    Salinity,
    #[serde(rename = "pH")]
    Ph,
}

/// Acceptable limit for a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Standard {
    /// Upper limit; anything at or above scores zero.
    Ceiling(f64),
    /// Inclusive acceptable range.
    Band { low: f64, high: f64 },
}

impl Parameter {
    pub const COUNT: usize = 7;

    pub const ALL: [Parameter; Parameter::COUNT] = [
        Parameter::Chloride,
        Parameter::Calcium,
        Parameter::Magnesium,
        Parameter::Sodium,
        Parameter::Potassium,
        Parameter::Salinity,
        Parameter::Ph,
    ];

    /// Position in `ALL`, used to index fixed-size per-parameter arrays.
    pub fn index(self) -> usize {
        match self {
            Parameter::Chloride => 0,
            Parameter::Calcium => 1,
            Parameter::Magnesium => 2,
            Parameter::Sodium => 3,
            Parameter::Potassium => 4,
            Parameter::Salinity => 5,
            Parameter::Ph => 6,
        }
    }

    /// Display name, identical to the key used in the model store and the
    /// prediction record.
    pub fn name(self) -> &'static str {
        match self {
            Parameter::Chloride => "Chloride as Cl",
            Parameter::Calcium => "Calcium (Total)",
            Parameter::Magnesium => "Total Magnesium",
            Parameter::Sodium => "Sodium as Na",
            Parameter::Potassium => "Potassium as K",
            Parameter::Salinity => "Salinity as EC@25 (lab)",
            Parameter::Ph => "pH",
        }
    }

    /// Field name in the history store.
    pub fn column(self) -> &'static str {
        match self {
            Parameter::Chloride => "chloride_cl",
            Parameter::Calcium => "calcium_total",
            Parameter::Magnesium => "magnesium_total",
            Parameter::Sodium => "sodium_na",
            Parameter::Potassium => "potassium_k",
            Parameter::Salinity => "salinity_ec",
            Parameter::Ph => "ph_value",
        }
    }

    pub fn from_name(name: &str) -> Option<Parameter> {
        Parameter::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn standard(self) -> Standard {
        match self {
            Parameter::Chloride => Standard::Ceiling(250.0),
            Parameter::Calcium => Standard::Ceiling(200.0),
            Parameter::Magnesium => Standard::Ceiling(150.0),
            Parameter::Sodium => Standard::Ceiling(200.0),
            Parameter::Potassium => Standard::Ceiling(12.0),
            Parameter::Salinity => Standard::Ceiling(500.0),
            Parameter::Ph => Standard::Band { low: 6.5, high: 8.5 },
        }
    }

    pub fn weight(self) -> f64 {
        match self {
            Parameter::Chloride => 0.10,
            Parameter::Calcium => 0.10,
            Parameter::Magnesium => 0.10,
            Parameter::Sodium => 0.20,
            Parameter::Potassium => 0.05,
            Parameter::Salinity => 0.25,
            Parameter::Ph => 0.20,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Sum of all parameter weights.
pub fn total_weight() -> f64 {
    Parameter::ALL.iter().map(|p| p.weight()).sum()
}

/// Checks that every weight lies in [0, 1] and that they sum to 1.
/// Called once at start-up before any prediction is served.
pub fn validate_weight_table() -> Result<(), WeightTableError> {
    for parameter in Parameter::ALL {
        let weight = parameter.weight();
        if !(0.0..=1.0).contains(&weight) {
            return Err(WeightTableError::OutOfRange { parameter, weight });
        }
    }

    let total = total_weight();
    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(WeightTableError::BadSum { total });
    }

    Ok(())
}
