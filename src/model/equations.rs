//! The model's equations, defined once per relationship in both representations.
//!
//! Every relationship is written as a pair: the log-linear form (deviations
//! from steady state) next to the nonlinear form (levels). Keeping the two side
//! by side is what keeps equation `i` of one representation the linearization
//! of equation `i` of the other.

use super::bindings::ParameterBindings;
use super::classification::VariableClassification;
use crate::analysis::references;
use crate::error::ModelError;
use crate::expr::{next, num, param, ss, var, Bindings, EvalError, Expr, LinearForm, LinearizeError};
use crate::params::ParameterScope;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Which economic relationship an equation encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Relationship {
    IntertemporalConsumption,
    LaborSupply,
    CapitalDemand,
    LaborDemand,
    Production,
    Markup,
    PriceAdjustment,
    ShockPersistence,
    MonetaryPolicy,
    ResourceConstraint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Representation {
    LogLinear,
    Nonlinear,
}

/// `lhs = rhs`, read as the residual `lhs - rhs = 0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Equation {
    pub relationship: Relationship,
    pub label: &'static str,
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    pub fn residual(&self) -> Expr {
        self.lhs.clone() - self.rhs.clone()
    }

    pub fn evaluate_residual(&self, bindings: &impl Bindings) -> Result<f64, EvalError> {
        Ok(self.lhs.evaluate(bindings)? - self.rhs.evaluate(bindings)?)
    }

    /// Coefficient row of the residual with steady-state weights folded to numbers.
    pub fn linear_form(&self, params: &impl ParameterScope) -> Result<LinearForm, LinearizeError> {
        self.residual().linear_form(&ParameterBindings(params))
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

struct EquationPair {
    relationship: Relationship,
    label: &'static str,
    loglinear: (Expr, Expr),
    nonlinear: (Expr, Expr),
}

impl EquationPair {
    fn into_equation(self, representation: Representation) -> Equation {
        let (lhs, rhs) = match representation {
            Representation::LogLinear => self.loglinear,
            Representation::Nonlinear => self.nonlinear,
        };
        Equation { relationship: self.relationship, label: self.label, lhs, rhs }
    }
}

fn one() -> Expr {
    num(1.0)
}

fn baseline_pairs() -> Vec<EquationPair> {
    use Relationship::*;
    vec![
        // --- Household ---
        EquationPair {
            relationship: IntertemporalConsumption,
            label: "Euler equation, real bond",
            loglinear: (-param("GAMMA") * var("C"), next("R") - param("GAMMA") * next("C")),
            nonlinear: (
                var("C").pow(-param("GAMMA")),
                param("BETA") * next("R") * next("C").pow(-param("GAMMA")),
            ),
        },
        EquationPair {
            relationship: IntertemporalConsumption,
            label: "Euler equation, nominal bond",
            loglinear: (-param("GAMMA") * var("C"), var("I") - next("Pi") - param("GAMMA") * next("C")),
            nonlinear: (
                var("C").pow(-param("GAMMA")),
                param("BETA") * var("I") / next("Pi") * next("C").pow(-param("GAMMA")),
            ),
        },
        EquationPair {
            relationship: LaborSupply,
            label: "labor supply",
            loglinear: (var("W") - param("GAMMA") * var("C"), param("ETA") * var("L")),
            nonlinear: (var("W") * var("C").pow(-param("GAMMA")), var("L").pow(param("ETA"))),
        },
        // --- Firm production ---
        EquationPair {
            relationship: CapitalDemand,
            label: "capital demand",
            loglinear: (
                var("MC"),
                ss("R") / (ss("R") - one() + param("DELTA")) * var("R") - var("A")
                    + (one() - param("ALPHA")) * var("K")
                    - (one() - param("ALPHA")) * var("L"),
            ),
            nonlinear: (
                var("MC"),
                (var("R") - one() + param("DELTA"))
                    / (param("ALPHA")
                        * var("A")
                        * var("K").pow(param("ALPHA") - one())
                        * var("L").pow(one() - param("ALPHA"))),
            ),
        },
        EquationPair {
            relationship: LaborDemand,
            label: "labor demand",
            loglinear: (
                var("MC"),
                var("W") - var("A") - param("ALPHA") * var("K") + param("ALPHA") * var("L"),
            ),
            nonlinear: (
                var("MC"),
                var("W")
                    / ((one() - param("ALPHA"))
                        * var("A")
                        * var("K").pow(param("ALPHA"))
                        * var("L").pow(-param("ALPHA"))),
            ),
        },
        EquationPair {
            relationship: Production,
            label: "production function",
            loglinear: (
                var("Y"),
                var("A") + param("ALPHA") * var("K") + (one() - param("ALPHA")) * var("L"),
            ),
            nonlinear: (
                var("Y"),
                var("A") * var("K").pow(param("ALPHA")) * var("L").pow(one() - param("ALPHA")),
            ),
        },
        EquationPair {
            relationship: Markup,
            label: "profit share",
            loglinear: (var("Omega") - var("Y"), -ss("MC") / (one() - ss("MC")) * var("MC")),
            nonlinear: (var("Omega") / var("Y"), one() - var("MC")),
        },
        // --- Firm pricing ---
        EquationPair {
            relationship: PriceAdjustment,
            label: "Phillips curve",
            loglinear: (
                var("Pi"),
                param("SIGMA") * ss("MC") / param("MU") * var("MC") + param("BETA") * next("Pi"),
            ),
            nonlinear: (
                param("MU") * var("Pi").ln(),
                param("SIGMA") * var("MC") - (param("SIGMA") - one())
                    + param("BETA") * param("MU") * next("Pi").ln(),
            ),
        },
        // --- Exogenous process ---
        EquationPair {
            relationship: ShockPersistence,
            label: "productivity process",
            loglinear: (next("A"), param("RHO_A") * var("A")),
            nonlinear: (
                next("A").ln(),
                param("RHO_A") * var("A").ln() + (one() - param("RHO_A")) * param("Abar").ln(),
            ),
        },
        // --- Monetary policy ---
        EquationPair {
            relationship: MonetaryPolicy,
            label: "Taylor rule",
            loglinear: (var("I"), next("R") + param("PHIpi") * var("Pi") + var("epsilon_I")),
            nonlinear: (
                var("I"),
                next("R")
                    * param("Pistar")
                    * (var("Pi") / param("Pistar")).pow(param("PHIpi"))
                    * var("epsilon_I").exp(),
            ),
        },
        // --- Resource ---
        EquationPair {
            relationship: ResourceConstraint,
            label: "resource constraint",
            loglinear: (
                ss("C") * var("C") + ss("K") * next("K"),
                ss("Y") * var("Y") + (one() - param("DELTA")) * ss("K") * var("K"),
            ),
            nonlinear: (var("C") + next("K"), var("Y") + (one() - param("DELTA")) * var("K")),
        },
    ]
}

/// The ordered equations of one representation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquationSet {
    representation: Representation,
    equations: Vec<Equation>,
}

impl EquationSet {
    /// Builds and validates the baseline equations.
    ///
    /// Every name must resolve: variables against `classification`, parameters
    /// and `_ss` references against `params`. The log-linear set references
    /// steady states, so building it before calibration fails with
    /// `UndefinedSteadyState`. Log-linear equations must also reduce to linear forms.
    pub fn build(
        representation: Representation,
        classification: &VariableClassification,
        params: &impl ParameterScope,
    ) -> Result<Self, ModelError> {
        let equations: Vec<Equation> =
            baseline_pairs().into_iter().map(|pair| pair.into_equation(representation)).collect();

        references::validate_references(&equations, classification, params)?;

        if representation == Representation::LogLinear {
            for (i, eq) in equations.iter().enumerate() {
                eq.linear_form(params).map_err(|e| match e {
                    LinearizeError::NonLinear(detail) => ModelError::NonLinearTerm { equation: i, detail },
                    LinearizeError::Eval(source) => ModelError::Evaluation { equation: i, source },
                })?;
            }
        }

        debug!(?representation, count = equations.len(), "equation set built");
        Ok(Self { representation, equations })
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }

    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    pub fn len(&self) -> usize {
        self.equations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    pub fn into_equations(self) -> Vec<Equation> {
        self.equations
    }
}
