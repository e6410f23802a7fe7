//! Parameter storage in three immutable stages.
//!
//! `CalibratedParameters` are the exogenous inputs. The calibrator turns them
//! into `DerivedParameters` (an append-only ledger of steady-state values), and
//! assembly merges both into a read-only `ResolvedParameters` view. Nothing is
//! mutated in place after construction.
pub mod calibrated;
pub mod derived;
pub mod resolved;

pub use calibrated::CalibratedParameters;
pub use derived::{DerivedParameters, StepRecord};
pub use resolved::ResolvedParameters;

/// Name lookup over a parameter set. Steady-state references (`X_ss`) resolve
/// through the same lookup, by bare name.
pub trait ParameterScope {
    fn lookup(&self, name: &str) -> Option<f64>;
}
