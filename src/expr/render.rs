//! Text rendering in the solver's naming convention.
//!
//! `C` is the current value, `C_p` the next-period value and `C_ss` the steady
//! state. Powers are written with `^`.

use super::node::{Expr, Timing, VarRef};
use std::fmt;

pub const NEXT_SUFFIX: &str = "_p";
pub const STEADY_STATE_SUFFIX: &str = "_ss";

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.timing {
            Timing::Current => write!(f, "{}", self.name),
            Timing::Next => write!(f, "{}{}", self.name, NEXT_SUFFIX),
        }
    }
}

// Binding strength, loosest first.
fn precedence(e: &Expr) -> u8 {
    match e {
        Expr::Add(..) | Expr::Sub(..) => 1,
        Expr::Mul(..) | Expr::Div(..) => 2,
        Expr::Neg(_) => 3,
        Expr::Const(c) if *c < 0.0 => 3,
        Expr::Pow(..) => 4,
        _ => 5,
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, e: &Expr, parens: bool) -> fmt::Result {
    if parens { write!(f, "({})", e) } else { write!(f, "{}", e) }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = precedence(self);
        match self {
            Expr::Const(c) => write!(f, "{}", c),
            Expr::Param(name) => write!(f, "{}", name),
            Expr::SteadyState(name) => write!(f, "{}{}", name, STEADY_STATE_SUFFIX),
            Expr::Var(v) => write!(f, "{}", v),
            Expr::Neg(a) => {
                write!(f, "-")?;
                write_operand(f, a, precedence(a) < p)
            }
            Expr::Log(a) => write!(f, "log({})", a),
            Expr::Exp(a) => write!(f, "exp({})", a),
            Expr::Add(l, r) | Expr::Sub(l, r) | Expr::Mul(l, r) | Expr::Div(l, r) => {
                let sym = match self {
                    Expr::Add(..) => "+",
                    Expr::Sub(..) => "-",
                    Expr::Mul(..) => "*",
                    _ => "/",
                };
                // Left-associative: the right operand needs parens at equal strength.
                write_operand(f, l, precedence(l) < p)?;
                write!(f, " {} ", sym)?;
                let tight = matches!(self, Expr::Sub(..) | Expr::Div(..));
                write_operand(f, r, precedence(r) < p || (tight && precedence(r) == p))
            }
            Expr::Pow(base, exponent) => {
                write_operand(f, base, precedence(base) <= p)?;
                write!(f, "^")?;
                write_operand(f, exponent, precedence(exponent) < p)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::expr::{next, num, param, ss, var};

    #[test]
    fn test_render_naming_convention() {
        let cases = vec![
            (-param("GAMMA") * var("C"), "-GAMMA * C"),
            (next("R") - param("GAMMA") * next("C"), "R_p - GAMMA * C_p"),
            (-ss("MC") / (num(1.0) - ss("MC")) * var("MC"), "-MC_ss / (1 - MC_ss) * MC"),
            (var("C").pow(-param("GAMMA")), "C^(-GAMMA)"),
            (var("K").pow(param("ALPHA") - num(1.0)), "K^(ALPHA - 1)"),
            (var("A") - (var("B") - var("C")), "A - (B - C)"),
            ((var("A") - var("B")) - var("C"), "A - B - C"),
            (var("Pi").ln(), "log(Pi)"),
            (next("epsilon_I").exp(), "exp(epsilon_I_p)"),
            ((var("Pi") / param("Pistar")).pow(param("PHIpi")), "(Pi / Pistar)^PHIpi"),
        ];

        for (expr, expected) in cases {
            assert_eq!(expr.to_string(), expected);
        }
    }
}
