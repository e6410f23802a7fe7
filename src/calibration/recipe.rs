//! The hand-derived steady-state recipe.
//!
//! Each `Step` names its output, the parameters it reads (in the order the
//! formula receives them) and a closed-form formula. Steps run strictly in
//! sequence: a step may only read calibrated inputs or outputs of earlier steps.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepKind {
    /// Steady-state value of a model variable; merged into the parameter set.
    SteadyState,
    /// Helper ratio used only by later steps.
    Intermediate,
}

/// Post-condition on a step's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Positive,
    /// Open interval (0, 1).
    UnitInterval,
}

impl Domain {
    pub fn holds(self, v: f64) -> bool {
        match self {
            Domain::Positive => v > 0.0,
            Domain::UnitInterval => v > 0.0 && v < 1.0,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Domain::Positive => "strictly positive",
            Domain::UnitInterval => "in (0, 1)",
        }
    }
}

/// Receives the step's inputs positionally; `Err` carries a domain-violation detail.
pub type Formula = fn(&[f64]) -> Result<f64, String>;

#[derive(Clone, Copy)]
pub struct Step {
    pub output: &'static str,
    pub inputs: &'static [&'static str],
    pub kind: StepKind,
    pub domain: Domain,
    pub formula: Formula,
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("output", &self.output)
            .field("inputs", &self.inputs)
            .field("kind", &self.kind)
            .field("domain", &self.domain)
            .finish()
    }
}

fn ratio(num: f64, den: f64) -> Result<f64, String> {
    if den == 0.0 {
        return Err(format!("division of {} by zero", num));
    }
    Ok(num / den)
}

fn fractional_pow(base: f64, exponent: f64) -> Result<f64, String> {
    if base < 0.0 {
        return Err(format!("fractional power {} of negative base {}", exponent, base));
    }
    if base == 0.0 && exponent < 0.0 {
        return Err(format!("negative power {} of zero", exponent));
    }
    Ok(base.powf(exponent))
}

fn ln(x: f64) -> Result<f64, String> {
    if x <= 0.0 {
        return Err(format!("logarithm of non-positive value {}", x));
    }
    Ok(x.ln())
}

pub static BASELINE_RECIPE: [Step; 14] = [
    // Inflation sits at target.
    Step {
        output: "Pi",
        inputs: &["Pistar"],
        kind: StepKind::SteadyState,
        domain: Domain::Positive,
        formula: |x| Ok(x[0]),
    },
    // Price-adjustment equation at rest: MU*log(Pi)*(1 - BETA) = SIGMA*MC - (SIGMA - 1).
    Step {
        output: "MC",
        inputs: &["SIGMA", "BETA", "MU", "Pi"],
        kind: StepKind::SteadyState,
        domain: Domain::UnitInterval,
        formula: |x| ratio(x[0] - 1.0 + (1.0 - x[1]) * x[2] * ln(x[3])?, x[0]),
    },
    Step {
        output: "A",
        inputs: &["Abar"],
        kind: StepKind::SteadyState,
        domain: Domain::Positive,
        formula: |x| Ok(x[0]),
    },
    Step {
        output: "R",
        inputs: &["BETA"],
        kind: StepKind::SteadyState,
        domain: Domain::Positive,
        formula: |x| ratio(1.0, x[0]),
    },
    Step {
        output: "I",
        inputs: &["R", "Pi"],
        kind: StepKind::SteadyState,
        domain: Domain::Positive,
        formula: |x| Ok(x[0] * x[1]),
    },
    // Capital FOC solved for k = K/L.
    Step {
        output: "K_per_L",
        inputs: &["MC", "ALPHA", "A", "R", "DELTA"],
        kind: StepKind::Intermediate,
        domain: Domain::Positive,
        formula: |x| {
            let base = ratio(x[0] * x[1] * x[2], x[3] - 1.0 + x[4])?;
            fractional_pow(base, ratio(1.0, 1.0 - x[1])?)
        },
    },
    Step {
        output: "W",
        inputs: &["A", "MC", "ALPHA", "K_per_L"],
        kind: StepKind::SteadyState,
        domain: Domain::Positive,
        formula: |x| Ok(x[0] * x[1] * (1.0 - x[2]) * fractional_pow(x[3], x[2])?),
    },
    Step {
        output: "Y_per_L",
        inputs: &["A", "K_per_L", "ALPHA"],
        kind: StepKind::Intermediate,
        domain: Domain::Positive,
        formula: |x| Ok(x[0] * fractional_pow(x[1], x[2])?),
    },
    Step {
        output: "C_per_L",
        inputs: &["Y_per_L", "DELTA", "K_per_L"],
        kind: StepKind::Intermediate,
        domain: Domain::Positive,
        formula: |x| Ok(x[0] - x[1] * x[2]),
    },
    // Labor supply W*C^(-GAMMA) = L^ETA with C = c*L, solved for L.
    Step {
        output: "L",
        inputs: &["W", "C_per_L", "GAMMA", "ETA"],
        kind: StepKind::SteadyState,
        domain: Domain::Positive,
        formula: |x| fractional_pow(x[0] * fractional_pow(x[1], -x[2])?, ratio(1.0, x[2] + x[3])?),
    },
    Step {
        output: "C",
        inputs: &["C_per_L", "L"],
        kind: StepKind::SteadyState,
        domain: Domain::Positive,
        formula: |x| Ok(x[0] * x[1]),
    },
    Step {
        output: "K",
        inputs: &["K_per_L", "L"],
        kind: StepKind::SteadyState,
        domain: Domain::Positive,
        formula: |x| Ok(x[0] * x[1]),
    },
    Step {
        output: "Y",
        inputs: &["Y_per_L", "L"],
        kind: StepKind::SteadyState,
        domain: Domain::Positive,
        formula: |x| Ok(x[0] * x[1]),
    },
    Step {
        output: "Omega",
        inputs: &["Y", "MC"],
        kind: StepKind::SteadyState,
        domain: Domain::Positive,
        formula: |x| Ok(x[0] * (1.0 - x[1])),
    },
];
