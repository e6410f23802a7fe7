//! The read-only parameter view handed to equations, the solver and the oracle.

use super::{CalibratedParameters, DerivedParameters, ParameterScope};
use crate::error::ModelError;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedParameters {
    values: BTreeMap<String, f64>,
    derived: BTreeSet<String>,
}

impl ResolvedParameters {
    /// Merges calibrated inputs with derived steady states. A derived name may
    /// not shadow a calibrated one.
    pub fn merge(calibrated: &CalibratedParameters, derived: &DerivedParameters) -> Result<Self, ModelError> {
        let mut values: BTreeMap<String, f64> = calibrated.iter().map(|(k, v)| (k.to_string(), v)).collect();
        let mut derived_names = BTreeSet::new();

        for (name, value) in derived.steady_states() {
            if values.insert(name.to_string(), value).is_some() {
                return Err(ModelError::DuplicateParameter { name: name.to_string() });
            }
            derived_names.insert(name.to_string());
        }

        Ok(Self { values, derived: derived_names })
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// True if `name` was produced by calibration rather than supplied.
    pub fn is_derived(&self, name: &str) -> bool {
        self.derived.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ParameterScope for ResolvedParameters {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name)
    }
}
