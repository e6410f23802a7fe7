//! Name-resolution checks over equations and specification tags.

use crate::error::ModelError;
use crate::expr::Expr;
use crate::model::{Equation, VariableClassification};
use crate::params::ParameterScope;

/// Every leaf of every equation must resolve.
///
/// Variables (current or `_p`) must be classified; parameters and `_ss`
/// references must exist in `params`. The first failure is reported with the
/// index of the equation it occurs in.
pub fn validate_references(
    equations: &[Equation],
    classification: &VariableClassification,
    params: &impl ParameterScope,
) -> Result<(), ModelError> {
    for (i, eq) in equations.iter().enumerate() {
        let mut failure = None;
        let mut check = |leaf: &Expr| {
            if failure.is_some() {
                return;
            }
            failure = match leaf {
                Expr::Var(v) if !classification.contains(&v.name) => {
                    Some(ModelError::UnknownVariable { equation: i, name: v.name.clone() })
                }
                Expr::Param(name) if params.lookup(name).is_none() => {
                    Some(ModelError::UndefinedParameter { equation: i, name: name.clone() })
                }
                Expr::SteadyState(name) if params.lookup(name).is_none() => {
                    Some(ModelError::UndefinedSteadyState { equation: i, name: name.clone() })
                }
                _ => None,
            };
        };
        eq.lhs.for_each_leaf(&mut check);
        eq.rhs.for_each_leaf(&mut check);

        if let Some(err) = failure {
            return Err(err);
        }
    }
    Ok(())
}

/// Every tagged name must satisfy `allowed`.
pub fn validate_tags<'a>(
    role: &'static str,
    names: impl IntoIterator<Item = &'a String>,
    allowed: impl Fn(&str) -> bool,
) -> Result<(), ModelError> {
    for name in names {
        if !allowed(name.as_str()) {
            return Err(ModelError::UnclassifiedTag { role, name: name.clone() });
        }
    }
    Ok(())
}
