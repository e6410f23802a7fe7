//! Defines the `Expr` tree and the references that appear at its leaves.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// The period a variable reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timing {
    /// The contemporaneous value (`C`).
    Current,
    /// The one-period-ahead value (`C_p`).
    Next,
}

/// A model variable at a given timing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarRef {
    pub name: String,
    pub timing: Timing,
}

impl VarRef {
    pub fn current(name: impl Into<String>) -> Self {
        Self { name: name.into(), timing: Timing::Current }
    }

    pub fn next(name: impl Into<String>) -> Self {
        Self { name: name.into(), timing: Timing::Next }
    }
}

/// A node in an equation's expression tree.
///
/// Leaves resolve against different scopes: `Var` against the simulation state,
/// `Param` and `SteadyState` against the parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Const(f64),
    Param(String),
    /// Long-run value of a variable, looked up by its bare name in the parameter set.
    SteadyState(String),
    Var(VarRef),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Log(Box<Expr>),
    Exp(Box<Expr>),
}

pub fn num(value: f64) -> Expr {
    Expr::Const(value)
}

pub fn param(name: &str) -> Expr {
    Expr::Param(name.to_string())
}

pub fn ss(name: &str) -> Expr {
    Expr::SteadyState(name.to_string())
}

pub fn var(name: &str) -> Expr {
    Expr::Var(VarRef::current(name))
}

pub fn next(name: &str) -> Expr {
    Expr::Var(VarRef::next(name))
}

impl Expr {
    pub fn pow(self, exponent: Expr) -> Expr {
        Expr::Pow(Box::new(self), Box::new(exponent))
    }

    pub fn ln(self) -> Expr {
        Expr::Log(Box::new(self))
    }

    pub fn exp(self) -> Expr {
        Expr::Exp(Box::new(self))
    }

    /// Visits every leaf in left-to-right order.
    pub fn for_each_leaf<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        match self {
            Expr::Const(_) | Expr::Param(_) | Expr::SteadyState(_) | Expr::Var(_) => visit(self),
            Expr::Neg(a) | Expr::Log(a) | Expr::Exp(a) => a.for_each_leaf(visit),
            Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) | Expr::Pow(a, b) => {
                a.for_each_leaf(visit);
                b.for_each_leaf(visit);
            }
        }
    }

    /// Every variable reference in the tree, in order of appearance (duplicates kept).
    pub fn variables(&self) -> Vec<&VarRef> {
        let mut out = Vec::new();
        self.for_each_leaf(&mut |leaf| {
            if let Expr::Var(v) = leaf {
                out.push(v);
            }
        });
        out
    }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

macro_rules! binary_op {
    ($trait:ident, $method:ident, $variant:ident) => {
        impl $trait for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                Expr::$variant(Box::new(self), Box::new(rhs))
            }
        }
    };
}

binary_op!(Add, add, Add);
binary_op!(Sub, sub, Sub);
binary_op!(Mul, mul, Mul);
binary_op!(Div, div, Div);
