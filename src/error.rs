//! error.rs
//! Configuration and domain errors raised while calibrating and assembling a model.

use crate::expr::EvalError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Calibrated parameter '{name}' is missing")]
    MissingParameter { name: String },
    #[error("Parameter '{name}' = {value} is out of domain: must be {requirement}")]
    ParameterDomain { name: String, value: f64, requirement: &'static str },
    #[error("Steady-state step {step} ('{output}') failed: {detail}")]
    StepDomain { step: usize, output: &'static str, detail: String },
    #[error("Steady-state step {step} ('{output}') reads '{input}' before it exists")]
    StepInputMissing { step: usize, output: &'static str, input: &'static str },
    #[error("Steady-state recipe is not in dependency order: {0}")]
    OrderingViolation(String),
    #[error("Parameter '{name}' is defined more than once")]
    DuplicateParameter { name: String },
    #[error("Variable '{name}' appears in more than one classification")]
    DuplicateClassification { name: String },
    #[error("Equation {equation} references unclassified variable '{name}'")]
    UnknownVariable { equation: usize, name: String },
    #[error("Equation {equation} references undefined parameter '{name}'")]
    UndefinedParameter { equation: usize, name: String },
    #[error("Equation {equation} references undefined steady state '{name}_ss'")]
    UndefinedSteadyState { equation: usize, name: String },
    #[error("Equation {equation} is not linear: {detail}")]
    NonLinearTerm { equation: usize, detail: String },
    #[error("Expected {expected} equations, found {actual}")]
    EquationCountMismatch { expected: usize, actual: usize },
    #[error("{role} '{name}' is not a classified variable")]
    UnclassifiedTag { role: &'static str, name: String },
    #[error("Evaluation of equation {equation} failed: {source}")]
    Evaluation { equation: usize, source: EvalError },
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        ModelError::InvalidConfiguration(e.to_string())
    }
}
