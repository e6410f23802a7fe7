//! Consistency checking between the nonlinear and log-linear representations.
//!
//! The builder only produces specifications; deciding whether two of them
//! describe the same model to first order is the job of an injected
//! `EquivalenceOracle`. `FirstOrderOracle` is the in-crate implementation.

mod first_order;

pub use first_order::FirstOrderOracle;

use crate::specification::ModelSpecification;
use std::fmt;
use thiserror::Error;

/// One equation pair that failed the comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct EquationMismatch {
    /// Position in both equation lists.
    pub index: usize,
    pub label: &'static str,
    pub reason: String,
}

impl fmt::Display for EquationMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "equation {} ({}): {}", self.index, self.label, self.reason)
    }
}

#[derive(Error, Debug, Clone, Default, PartialEq)]
#[error("representations are not equivalent: {} structural and {} equation mismatches", .structural.len(), .equations.len())]
pub struct MismatchReport {
    /// Mismatches that make a per-equation comparison meaningless.
    pub structural: Vec<String>,
    pub equations: Vec<EquationMismatch>,
}

impl MismatchReport {
    pub fn is_empty(&self) -> bool {
        self.structural.is_empty() && self.equations.is_empty()
    }
}

pub trait EquivalenceOracle {
    /// Succeeds when `a` and `b` agree to first order around the steady state.
    fn check_equivalent(&self, a: &ModelSpecification, b: &ModelSpecification) -> Result<(), MismatchReport>;
}
