//! Calibrated (exogenous) parameters and their domain rules.

use super::ParameterScope;
use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The mathematical domain a calibrated parameter must lie in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    Finite,
    Positive,
    NonNegative,
    GreaterThanOne,
    /// Open interval (0, 1).
    OpenUnit,
    /// Half-open interval (0, 1].
    HalfOpenUnit,
    /// Open interval (-1, 1).
    Persistence,
}

impl Requirement {
    fn holds(self, v: f64) -> bool {
        match self {
            Requirement::Finite => true,
            Requirement::Positive => v > 0.0,
            Requirement::NonNegative => v >= 0.0,
            Requirement::GreaterThanOne => v > 1.0,
            Requirement::OpenUnit => v > 0.0 && v < 1.0,
            Requirement::HalfOpenUnit => v > 0.0 && v <= 1.0,
            Requirement::Persistence => v > -1.0 && v < 1.0,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Requirement::Finite => "finite",
            Requirement::Positive => "strictly positive",
            Requirement::NonNegative => "non-negative",
            Requirement::GreaterThanOne => "greater than 1",
            Requirement::OpenUnit => "in (0, 1)",
            Requirement::HalfOpenUnit => "in (0, 1]",
            Requirement::Persistence => "in (-1, 1)",
        }
    }
}

// Every parameter the model reads, with the domain its formulas need.
const DOMAIN_RULES: &[(&str, Requirement)] = &[
    ("GAMMA", Requirement::Positive),
    ("BETA", Requirement::OpenUnit),
    ("ETA", Requirement::NonNegative),
    ("ALPHA", Requirement::OpenUnit),
    ("RHO_A", Requirement::Persistence),
    ("Abar", Requirement::Positive),
    ("Pistar", Requirement::Positive),
    ("PHIpi", Requirement::Finite),
    ("MU", Requirement::Positive),
    ("SIGMA", Requirement::GreaterThanOne),
    ("DELTA", Requirement::HalfOpenUnit),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalibratedParameters {
    values: BTreeMap<String, f64>,
}

impl CalibratedParameters {
    pub fn new(values: BTreeMap<String, f64>) -> Self {
        Self { values }
    }

    /// Quarterly calibration: 4% annual discounting, 2% annual inflation target.
    pub fn baseline() -> Self {
        let values = [
            ("GAMMA", 1.0),
            ("BETA", 0.96f64.powf(0.25)),
            ("ETA", 2.0),
            ("ALPHA", 0.3),
            ("RHO_A", 0.95),
            ("Abar", 1.0),
            ("Pistar", 1.02f64.powf(0.25)),
            ("PHIpi", 1.5),
            ("MU", 100.0),
            ("SIGMA", 8.0),
            ("DELTA", 0.1),
        ];
        Self { values: values.into_iter().map(|(k, v)| (k.to_string(), v)).collect() }
    }

    /// Parses a flat JSON object of `name: value` pairs.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(Self { values: serde_json::from_str(json)? })
    }

    /// Returns a copy with one parameter replaced or added.
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn require(&self, name: &str) -> Result<f64, ModelError> {
        self.get(name).ok_or_else(|| ModelError::MissingParameter { name: name.to_string() })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Checks that every parameter the model needs is present, finite and in domain.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (name, value) in &self.values {
            if !value.is_finite() {
                return Err(ModelError::ParameterDomain { name: name.clone(), value: *value, requirement: "finite" });
            }
        }
        for &(name, requirement) in DOMAIN_RULES {
            let value = self.require(name)?;
            if !requirement.holds(value) {
                return Err(ModelError::ParameterDomain {
                    name: name.to_string(),
                    value,
                    requirement: requirement.describe(),
                });
            }
        }
        Ok(())
    }
}

impl Default for CalibratedParameters {
    fn default() -> Self {
        Self::baseline()
    }
}

impl ParameterScope for CalibratedParameters {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name)
    }
}
