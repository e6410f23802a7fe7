//! The immutable artifact handed to the solver and the oracle.

use crate::analysis::references;
use crate::error::ModelError;
use crate::model::{Equation, EquationSet, Representation, Role, VariableClassification};
use crate::params::ResolvedParameters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Reporting metadata attached to every specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecificationOptions {
    /// Shocks whose impulse responses the solver should report. States are
    /// allowed: a productivity IRF is a shock to `A` itself.
    pub irf_shocks: Vec<String>,
    /// Variables treated as headline outputs.
    pub headline_variables: Vec<String>,
    /// Where the solver persists its output.
    pub output_location: PathBuf,
}

impl Default for SpecificationOptions {
    fn default() -> Self {
        Self {
            irf_shocks: vec!["A".into(), "epsilon_I".into()],
            headline_variables: ["C", "R", "Pi", "I", "K", "L"].iter().map(|s| s.to_string()).collect(),
            output_location: PathBuf::from("temp/"),
        }
    }
}

impl SpecificationOptions {
    /// Parses options from JSON; omitted fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSpecification {
    representation: Representation,
    parameters: ResolvedParameters,
    variables: VariableClassification,
    equations: Vec<Equation>,
    /// Variables the solver log-transforms. Empty for the log-linear form,
    /// whose variables are already log-deviations.
    log_variables: Vec<String>,
    irf_shocks: Vec<String>,
    headline_variables: Vec<String>,
    output_location: PathBuf,
}

impl ModelSpecification {
    /// Combines one representation's equations with the resolved parameters.
    ///
    /// Checks that there is one equation per endogenous variable, that every
    /// equation still resolves against these parameters, and that the
    /// reporting tags name classified variables.
    pub fn assemble(
        equations: EquationSet,
        variables: VariableClassification,
        parameters: ResolvedParameters,
        options: &SpecificationOptions,
    ) -> Result<Self, ModelError> {
        let expected = variables.endogenous_count();
        if equations.len() != expected {
            return Err(ModelError::EquationCountMismatch { expected, actual: equations.len() });
        }
        references::validate_references(equations.equations(), &variables, &parameters)?;
        references::validate_tags("IRF shock", &options.irf_shocks, |n| {
            matches!(variables.role(n), Some(Role::State | Role::Shock))
        })?;
        references::validate_tags("headline variable", &options.headline_variables, |n| variables.contains(n))?;

        let representation = equations.representation();
        let log_variables = match representation {
            Representation::LogLinear => Vec::new(),
            Representation::Nonlinear => variables.endogenous().cloned().collect(),
        };

        info!(?representation, equations = equations.len(), parameters = parameters.len(), "specification assembled");
        Ok(Self {
            representation,
            parameters,
            variables,
            equations: equations.into_equations(),
            log_variables,
            irf_shocks: options.irf_shocks.clone(),
            headline_variables: options.headline_variables.clone(),
            output_location: options.output_location.clone(),
        })
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }

    pub fn is_loglinear(&self) -> bool {
        self.representation == Representation::LogLinear
    }

    pub fn parameters(&self) -> &ResolvedParameters {
        &self.parameters
    }

    pub fn variables(&self) -> &VariableClassification {
        &self.variables
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    pub fn log_variables(&self) -> &[String] {
        &self.log_variables
    }

    pub fn irf_shocks(&self) -> &[String] {
        &self.irf_shocks
    }

    pub fn headline_variables(&self) -> &[String] {
        &self.headline_variables
    }

    pub fn output_location(&self) -> &Path {
        &self.output_location
    }

    /// Steady-state value of a state or control.
    pub fn steady_state(&self, variable: &str) -> Option<f64> {
        match self.variables.role(variable)? {
            Role::Shock => Some(0.0),
            Role::State | Role::Control => self.parameters.get(variable),
        }
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::SteadyStateCalibrator;
    use crate::params::CalibratedParameters;

    fn parts(representation: Representation) -> (EquationSet, VariableClassification, ResolvedParameters) {
        let calibrated = CalibratedParameters::baseline();
        let derived = SteadyStateCalibrator::baseline().unwrap().calibrate(&calibrated).unwrap();
        let params = ResolvedParameters::merge(&calibrated, &derived).unwrap();
        let vars = VariableClassification::baseline();
        let eqs = EquationSet::build(representation, &vars, &params).unwrap();
        (eqs, vars, params)
    }

    #[test]
    fn test_assemble_tags_metadata() {
        let (eqs, vars, params) = parts(Representation::Nonlinear);
        let spec = ModelSpecification::assemble(eqs, vars, params, &SpecificationOptions::default()).unwrap();

        assert!(!spec.is_loglinear());
        assert_eq!(spec.log_variables().len(), 11);
        assert_eq!(spec.irf_shocks(), ["A".to_string(), "epsilon_I".to_string()]);
        assert_eq!(spec.headline_variables().len(), 6);
        assert_eq!(spec.output_location(), Path::new("temp/"));
        assert_eq!(spec.steady_state("epsilon_I"), Some(0.0));
        assert!(spec.steady_state("K").unwrap() > 0.0);
    }

    #[test]
    fn test_loglinear_has_no_log_variables() {
        let (eqs, vars, params) = parts(Representation::LogLinear);
        let spec = ModelSpecification::assemble(eqs, vars, params, &SpecificationOptions::default()).unwrap();
        assert!(spec.is_loglinear());
        assert!(spec.log_variables().is_empty());
    }

    #[test]
    fn test_rejects_control_as_irf_shock() {
        let (eqs, vars, params) = parts(Representation::LogLinear);
        let options = SpecificationOptions { irf_shocks: vec!["C".into()], ..Default::default() };
        let err = ModelSpecification::assemble(eqs, vars, params, &options).unwrap_err();
        assert_eq!(err, ModelError::UnclassifiedTag { role: "IRF shock", name: "C".into() });
    }

    #[test]
    fn test_rejects_equation_count_mismatch() {
        let (eqs, vars, params) = parts(Representation::LogLinear);
        let fewer = VariableClassification::new(
            vars.states().to_vec(),
            vars.controls()[..8].to_vec(),
            vars.shocks().to_vec(),
        )
        .unwrap();
        let err = ModelSpecification::assemble(eqs, fewer, params, &SpecificationOptions::default()).unwrap_err();
        assert_eq!(err, ModelError::EquationCountMismatch { expected: 10, actual: 11 });
    }

    #[test]
    fn test_options_from_json_keeps_defaults() {
        let options = SpecificationOptions::from_json(r#"{"output_location": "/tmp/irfs"}"#).unwrap();
        assert_eq!(options.output_location, PathBuf::from("/tmp/irfs"));
        assert_eq!(options.irf_shocks, SpecificationOptions::default().irf_shocks);
    }

    #[test]
    fn test_json_round_trip_of_structure() {
        let (eqs, vars, params) = parts(Representation::LogLinear);
        let spec = ModelSpecification::assemble(eqs, vars, params, &SpecificationOptions::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&spec.to_json().unwrap()).unwrap();
        assert_eq!(value["representation"], "LogLinear");
        assert_eq!(value["equations"].as_array().unwrap().len(), 11);
        assert_eq!(value["variables"]["states"][1], "K");
    }
}
