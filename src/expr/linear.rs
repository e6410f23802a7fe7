//! Extraction of linear coefficient rows from log-linear equations.
//!
//! A `LinearForm` is what a perturbation solver actually consumes: one
//! coefficient per (variable, timing) plus a constant. Steady-state weights and
//! parameters are folded to numeric literals during extraction.

use super::eval::Bindings;
use super::node::{Expr, VarRef};
use smallvec::SmallVec;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearForm {
    terms: SmallVec<[(VarRef, f64); 8]>,
    pub constant: f64,
}

impl LinearForm {
    fn constant(c: f64) -> Self {
        Self { terms: SmallVec::new(), constant: c }
    }

    fn term(var: VarRef) -> Self {
        let mut terms = SmallVec::new();
        terms.push((var, 1.0));
        Self { terms, constant: 0.0 }
    }

    fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    fn scale(mut self, k: f64) -> Self {
        for (_, c) in self.terms.iter_mut() {
            *c *= k;
        }
        self.constant *= k;
        self
    }

    fn combine(mut self, other: Self, sign: f64) -> Self {
        for (var, c) in other.terms {
            match self.terms.iter_mut().find(|(v, _)| *v == var) {
                Some((_, existing)) => *existing += sign * c,
                None => self.terms.push((var, sign * c)),
            }
        }
        self.constant += sign * other.constant;
        self
    }

    /// Coefficient on `var`, zero if it does not appear.
    pub fn coefficient(&self, var: &VarRef) -> f64 {
        self.terms.iter().find(|(v, _)| v == var).map_or(0.0, |(_, c)| *c)
    }

    pub fn terms(&self) -> &[(VarRef, f64)] {
        &self.terms
    }
}

/// Why an expression could not be reduced to a linear form.
#[derive(Debug, Clone, PartialEq)]
pub enum LinearizeError {
    NonLinear(String),
    Eval(super::EvalError),
}

impl Expr {
    /// Reduces the expression to `sum(coef * var) + constant`.
    pub fn linear_form(&self, bindings: &impl Bindings) -> Result<LinearForm, LinearizeError> {
        match self {
            Expr::Var(v) => Ok(LinearForm::term(v.clone())),
            Expr::Const(_) | Expr::Param(_) | Expr::SteadyState(_) => {
                self.evaluate(bindings).map(LinearForm::constant).map_err(LinearizeError::Eval)
            }
            Expr::Neg(a) => Ok(a.linear_form(bindings)?.scale(-1.0)),
            Expr::Add(l, r) => Ok(l.linear_form(bindings)?.combine(r.linear_form(bindings)?, 1.0)),
            Expr::Sub(l, r) => Ok(l.linear_form(bindings)?.combine(r.linear_form(bindings)?, -1.0)),
            Expr::Mul(l, r) => {
                let (l, r) = (l.linear_form(bindings)?, r.linear_form(bindings)?);
                if l.is_constant() {
                    Ok(r.scale(l.constant))
                } else if r.is_constant() {
                    Ok(l.scale(r.constant))
                } else {
                    Err(LinearizeError::NonLinear(format!("product of variables in '{}'", self)))
                }
            }
            Expr::Div(l, r) => {
                let r_form = r.linear_form(bindings)?;
                if !r_form.is_constant() {
                    return Err(LinearizeError::NonLinear(format!("division by a variable in '{}'", self)));
                }
                if r_form.constant == 0.0 {
                    return Err(LinearizeError::Eval(super::EvalError::DivisionByZero));
                }
                Ok(l.linear_form(bindings)?.scale(1.0 / r_form.constant))
            }
            Expr::Pow(..) | Expr::Log(_) | Expr::Exp(_) => {
                // Allowed only when the whole subtree is free of variables.
                if self.variables().is_empty() {
                    self.evaluate(bindings).map(LinearForm::constant).map_err(LinearizeError::Eval)
                } else {
                    Err(LinearizeError::NonLinear(format!("nonlinear operator applied to a variable in '{}'", self)))
                }
            }
        }
    }
}
