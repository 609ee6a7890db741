// Historical chemistry readings and predicted parameter sets
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, Serializer};

use super::parameter::Parameter;

/// One observation at a site. Any parameter may be missing.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalReading {
    pub observed_at: DateTime<Utc>,
    values: [Option<f64>; Parameter::COUNT],
}

impl HistoricalReading {
    pub fn new(observed_at: DateTime<Utc>) -> Self {
        Self {
            observed_at,
            values: [None; Parameter::COUNT],
        }
    }

    pub fn with(mut self, parameter: Parameter, value: f64) -> Self {
        self.set(parameter, Some(value));
        self
    }

    pub fn set(&mut self, parameter: Parameter, value: Option<f64>) {
        self.values[parameter.index()] = value;
    }

    pub fn get(&self, parameter: Parameter) -> Option<f64> {
        self.values[parameter.index()]
    }
}

/// A value for every parameter. Parameters nothing was predicted for hold 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PredictedParameters {
    values: [f64; Parameter::COUNT],
}

impl PredictedParameters {
    pub fn set(&mut self, parameter: Parameter, value: f64) {
        self.values[parameter.index()] = value;
    }

    pub fn get(&self, parameter: Parameter) -> f64 {
        self.values[parameter.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Parameter, f64)> + '_ {
        Parameter::ALL.into_iter().map(|p| (p, self.get(p)))
    }
}

impl FromIterator<(Parameter, f64)> for PredictedParameters {
    fn from_iter<I: IntoIterator<Item = (Parameter, f64)>>(iter: I) -> Self {
        let mut predicted = PredictedParameters::default();
        for (parameter, value) in iter {
            predicted.set(parameter, value);
        }
        predicted
    }
}

impl Serialize for PredictedParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(p, v)| (p.name(), v)))
    }
}
