use super::{EquationMismatch, EquivalenceOracle, MismatchReport};
use crate::expr::{Bindings, VarRef};
use crate::model::{Equation, Representation, SteadyStateBindings, VariableClassification};
use crate::params::ResolvedParameters;
use crate::specification::ModelSpecification;
use tracing::{debug, warn};

/// Compares each nonlinear equation, linearized around the steady state, with
/// its log-linear counterpart.
///
/// Derivatives come from forward-mode evaluation of the expression tree. For a
/// variable in the nonlinear specification's `log_variables` the level slope
/// is multiplied by the steady-state value, which turns it into the slope with
/// respect to the log-deviation; shocks stay in levels. The resulting gradient
/// must be a non-zero multiple of the log-linear coefficient row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstOrderOracle {
    tolerance: f64,
}

impl Default for FirstOrderOracle {
    fn default() -> Self {
        Self { tolerance: 1e-8 }
    }
}

struct Expansion<'a> {
    at_steady_state: SteadyStateBindings<'a>,
    linear_params: &'a ResolvedParameters,
    log_variables: &'a [String],
}

impl FirstOrderOracle {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn structural(linear: &ModelSpecification, nonlinear: &ModelSpecification) -> Vec<String> {
        let mut issues = Vec::new();
        if linear.variables() != nonlinear.variables() {
            issues.push("variable classifications differ".to_string());
        }
        if linear.parameters() != nonlinear.parameters() {
            issues.push("resolved parameter sets differ".to_string());
        }
        if linear.equations().len() != nonlinear.equations().len() {
            issues.push(format!(
                "equation counts differ: {} log-linear, {} nonlinear",
                linear.equations().len(),
                nonlinear.equations().len()
            ));
        }
        issues
    }

    fn compare(
        &self,
        linear: &Equation,
        nonlinear: &Equation,
        variables: &VariableClassification,
        ctx: &Expansion<'_>,
    ) -> Result<(), String> {
        if linear.relationship != nonlinear.relationship {
            return Err(format!(
                "log-linear {:?} paired with nonlinear {:?}",
                linear.relationship, nonlinear.relationship
            ));
        }

        let residual = nonlinear.residual();
        let level = residual
            .evaluate(&ctx.at_steady_state)
            .map_err(|e| format!("nonlinear residual cannot be evaluated at the steady state: {}", e))?;
        let magnitude = nonlinear.lhs.evaluate(&ctx.at_steady_state).map_or(1.0, |v| v.abs().max(1.0));
        if level.abs() > self.tolerance * magnitude {
            return Err(format!("nonlinear residual is {:e} at the steady state", level));
        }

        let row = linear
            .linear_form(ctx.linear_params)
            .map_err(|e| format!("log-linear equation does not reduce to a linear row: {:?}", e))?;
        if row.constant.abs() > self.tolerance {
            return Err(format!("log-linear constant is {:e}", row.constant));
        }

        let mut gradient = Vec::new();
        let mut coefficients = Vec::new();
        for name in variables.all() {
            for var in [VarRef::current(name.as_str()), VarRef::next(name.as_str())] {
                let slope = residual
                    .derivative(&ctx.at_steady_state, &var)
                    .map_err(|e| format!("derivative with respect to {} failed: {}", var, e))?
                    .slope;
                let weight = if ctx.log_variables.contains(name) {
                    ctx.at_steady_state.variable(&var).unwrap_or(0.0)
                } else {
                    1.0
                };
                gradient.push(slope * weight);
                coefficients.push(row.coefficient(&var));
            }
        }

        // Both sides at unit max-abs scale.
        let Some(coefficients) = unit_scaled(coefficients) else {
            return Err("log-linear row has no variable terms".into());
        };
        let Some(gradient) = unit_scaled(gradient) else {
            return Err("nonlinear equation has no first-order content".into());
        };
        let scale = dot(&gradient, &coefficients) / dot(&coefficients, &coefficients);
        let deviation = gradient
            .iter()
            .zip(&coefficients)
            .fold(0.0_f64, |m, (g, c)| m.max((g - scale * c).abs()));
        if deviation > self.tolerance {
            return Err(format!(
                "gradient is not proportional to the log-linear row (relative deviation {:e})",
                deviation
            ));
        }
        Ok(())
    }
}

/// Divides by the largest absolute entry. `None` for an all-zero vector.
fn unit_scaled(v: Vec<f64>) -> Option<Vec<f64>> {
    let largest = v.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    (largest > 0.0).then(|| v.into_iter().map(|x| x / largest).collect())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl EquivalenceOracle for FirstOrderOracle {
    fn check_equivalent(&self, a: &ModelSpecification, b: &ModelSpecification) -> Result<(), MismatchReport> {
        let (linear, nonlinear) = match (a.representation(), b.representation()) {
            (Representation::LogLinear, Representation::Nonlinear) => (a, b),
            (Representation::Nonlinear, Representation::LogLinear) => (b, a),
            (x, y) => {
                let report = MismatchReport {
                    structural: vec![format!("need one log-linear and one nonlinear specification, got {:?} and {:?}", x, y)],
                    equations: Vec::new(),
                };
                warn!(%report, "equivalence check failed");
                return Err(report);
            }
        };

        let structural = Self::structural(linear, nonlinear);
        if !structural.is_empty() {
            let report = MismatchReport { structural, equations: Vec::new() };
            warn!(%report, "equivalence check failed");
            return Err(report);
        }

        let ctx = Expansion {
            at_steady_state: SteadyStateBindings {
                params: nonlinear.parameters(),
                classification: nonlinear.variables(),
            },
            linear_params: linear.parameters(),
            log_variables: nonlinear.log_variables(),
        };
        let equations: Vec<EquationMismatch> = linear
            .equations()
            .iter()
            .zip(nonlinear.equations())
            .enumerate()
            .filter_map(|(index, (lin, nl))| {
                self.compare(lin, nl, nonlinear.variables(), &ctx)
                    .err()
                    .map(|reason| EquationMismatch { index, label: nl.label, reason })
            })
            .collect();

        if equations.is_empty() {
            debug!(equations = linear.equations().len(), "representations agree to first order");
            return Ok(());
        }
        for mismatch in &equations {
            warn!(%mismatch, "equation pair disagrees");
        }
        Err(MismatchReport { structural: Vec::new(), equations })
    }
}
