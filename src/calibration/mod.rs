//! Closed-form steady-state calibration.
//!
//! No root-finding: the steady state is obtained by direct substitution through
//! a fixed sequence of formulas, each reading only values computed before it.
pub mod calibrator;
pub mod recipe;

pub use calibrator::SteadyStateCalibrator;
pub use recipe::{Domain, Formula, Step, StepKind, BASELINE_RECIPE};
