//! Numeric evaluation of expression trees.
//!
//! Evaluation is forward-mode: every node yields a `Dual` (value plus the
//! derivative with respect to one seeded variable). Plain evaluation is the
//! same walk with no seed.

use super::node::{Expr, VarRef};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Unresolved variable '{0}'")]
    UnresolvedVariable(String),
    #[error("Unresolved parameter '{0}'")]
    UnresolvedParameter(String),
    #[error("Unresolved steady state '{0}_ss'")]
    UnresolvedSteadyState(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Math domain error in {op}: argument {value}")]
    Domain { op: &'static str, value: f64 },
    #[error("Non-finite result in {op}")]
    NonFinite { op: &'static str },
}

/// Resolves the leaves of an expression tree.
pub trait Bindings {
    fn variable(&self, var: &VarRef) -> Option<f64>;
    fn parameter(&self, name: &str) -> Option<f64>;
    fn steady_state(&self, name: &str) -> Option<f64>;
}

/// A value paired with its derivative along one seeded direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dual {
    pub value: f64,
    pub slope: f64,
}

impl Dual {
    fn constant(value: f64) -> Self {
        Self { value, slope: 0.0 }
    }
}

impl Expr {
    pub fn evaluate(&self, bindings: &impl Bindings) -> Result<f64, EvalError> {
        Ok(self.eval_dual(bindings, None)?.value)
    }

    /// Value and partial derivative with respect to `wrt` (in levels).
    pub fn derivative(&self, bindings: &impl Bindings, wrt: &VarRef) -> Result<Dual, EvalError> {
        self.eval_dual(bindings, Some(wrt))
    }

    fn eval_dual(&self, b: &impl Bindings, wrt: Option<&VarRef>) -> Result<Dual, EvalError> {
        let out = match self {
            Expr::Const(c) => Dual::constant(*c),
            Expr::Param(name) => {
                let v = b.parameter(name).ok_or_else(|| EvalError::UnresolvedParameter(name.clone()))?;
                Dual::constant(v)
            }
            Expr::SteadyState(name) => {
                let v = b.steady_state(name).ok_or_else(|| EvalError::UnresolvedSteadyState(name.clone()))?;
                Dual::constant(v)
            }
            Expr::Var(r) => {
                let v = b.variable(r).ok_or_else(|| EvalError::UnresolvedVariable(r.name.clone()))?;
                Dual { value: v, slope: if wrt == Some(r) { 1.0 } else { 0.0 } }
            }
            Expr::Neg(a) => {
                let a = a.eval_dual(b, wrt)?;
                Dual { value: -a.value, slope: -a.slope }
            }
            Expr::Add(l, r) => {
                let (l, r) = (l.eval_dual(b, wrt)?, r.eval_dual(b, wrt)?);
                Dual { value: l.value + r.value, slope: l.slope + r.slope }
            }
            Expr::Sub(l, r) => {
                let (l, r) = (l.eval_dual(b, wrt)?, r.eval_dual(b, wrt)?);
                Dual { value: l.value - r.value, slope: l.slope - r.slope }
            }
            Expr::Mul(l, r) => {
                let (l, r) = (l.eval_dual(b, wrt)?, r.eval_dual(b, wrt)?);
                Dual { value: l.value * r.value, slope: l.slope * r.value + l.value * r.slope }
            }
            Expr::Div(l, r) => {
                let (l, r) = (l.eval_dual(b, wrt)?, r.eval_dual(b, wrt)?);
                if r.value == 0.0 {
                    return Err(EvalError::DivisionByZero);
                }
                Dual {
                    value: l.value / r.value,
                    slope: (l.slope * r.value - l.value * r.slope) / (r.value * r.value),
                }
            }
            Expr::Pow(base, exponent) => {
                let (x, e) = (base.eval_dual(b, wrt)?, exponent.eval_dual(b, wrt)?);
                pow_dual(x, e)?
            }
            Expr::Log(a) => {
                let a = a.eval_dual(b, wrt)?;
                if a.value <= 0.0 {
                    return Err(EvalError::Domain { op: "log", value: a.value });
                }
                Dual { value: a.value.ln(), slope: a.slope / a.value }
            }
            Expr::Exp(a) => {
                let a = a.eval_dual(b, wrt)?;
                let v = a.value.exp();
                Dual { value: v, slope: v * a.slope }
            }
        };

        if !out.value.is_finite() || !out.slope.is_finite() {
            return Err(EvalError::NonFinite { op: op_name(self) });
        }
        Ok(out)
    }
}

fn pow_dual(x: Dual, e: Dual) -> Result<Dual, EvalError> {
    if x.value < 0.0 && e.value.fract() != 0.0 {
        return Err(EvalError::Domain { op: "pow", value: x.value });
    }
    if x.value == 0.0 && e.value < 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    let value = x.value.powf(e.value);

    // Constant exponent: power rule. Otherwise the base must be positive.
    let slope = if e.slope == 0.0 {
        if x.slope == 0.0 { 0.0 } else { e.value * x.value.powf(e.value - 1.0) * x.slope }
    } else {
        if x.value <= 0.0 {
            return Err(EvalError::Domain { op: "pow", value: x.value });
        }
        value * (e.slope * x.value.ln() + e.value * x.slope / x.value)
    };
    Ok(Dual { value, slope })
}

fn op_name(e: &Expr) -> &'static str {
    match e {
        Expr::Const(_) => "const",
        Expr::Param(_) => "param",
        Expr::SteadyState(_) => "steady_state",
        Expr::Var(_) => "var",
        Expr::Neg(_) => "neg",
        Expr::Add(..) => "add",
        Expr::Sub(..) => "sub",
        Expr::Mul(..) => "mul",
        Expr::Div(..) => "div",
        Expr::Pow(..) => "pow",
        Expr::Log(_) => "log",
        Expr::Exp(_) => "exp",
    }
}
