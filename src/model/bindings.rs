//! Ready-made `Bindings` for evaluating model equations.

use super::classification::{Role, VariableClassification};
use crate::expr::{Bindings, VarRef};
use crate::params::{ParameterScope, ResolvedParameters};

/// Resolves parameters and steady states only. Used to fold log-linear weights.
pub struct ParameterBindings<'a, P: ParameterScope>(pub &'a P);

impl<P: ParameterScope> Bindings for ParameterBindings<'_, P> {
    fn variable(&self, _: &VarRef) -> Option<f64> {
        None
    }
    fn parameter(&self, name: &str) -> Option<f64> {
        self.0.lookup(name)
    }
    fn steady_state(&self, name: &str) -> Option<f64> {
        self.0.lookup(name)
    }
}

/// Every variable, current or next period, sits at its steady state. Shocks are zero.
pub struct SteadyStateBindings<'a> {
    pub params: &'a ResolvedParameters,
    pub classification: &'a VariableClassification,
}

impl Bindings for SteadyStateBindings<'_> {
    fn variable(&self, var: &VarRef) -> Option<f64> {
        match self.classification.role(&var.name)? {
            Role::Shock => Some(0.0),
            Role::State | Role::Control => self.params.get(&var.name),
        }
    }
    fn parameter(&self, name: &str) -> Option<f64> {
        self.params.get(name)
    }
    fn steady_state(&self, name: &str) -> Option<f64> {
        self.params.get(name)
    }
}

/// Every log-deviation is zero: the log-linear model's rest point.
pub struct ZeroDeviationBindings<'a> {
    pub params: &'a ResolvedParameters,
    pub classification: &'a VariableClassification,
}

impl Bindings for ZeroDeviationBindings<'_> {
    fn variable(&self, var: &VarRef) -> Option<f64> {
        self.classification.contains(&var.name).then_some(0.0)
    }
    fn parameter(&self, name: &str) -> Option<f64> {
        self.params.get(name)
    }
    fn steady_state(&self, name: &str) -> Option<f64> {
        self.params.get(name)
    }
}
