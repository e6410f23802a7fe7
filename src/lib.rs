// Crate root: a DSGE model specification builder.
// Calibrates the steady state of a New Keynesian model with capital, builds
// its nonlinear and log-linear equation sets, and hands the result to an
// injected equivalence oracle or perturbation solver.

pub mod analysis;
pub mod calibration;
pub mod display;
pub mod error;
pub mod expr;
pub mod model;
pub mod oracle;
pub mod params;
pub mod pipeline;
pub mod solver;
pub mod specification;

// --- Public surface ---
pub use calibration::SteadyStateCalibrator;
pub use error::ModelError;
pub use model::{Equation, EquationSet, Relationship, Representation, VariableClassification};
pub use oracle::{EquivalenceOracle, FirstOrderOracle, MismatchReport};
pub use params::{CalibratedParameters, DerivedParameters, ResolvedParameters};
pub use pipeline::{calibration_sweep, CheckError, ModelBuilder};
pub use solver::{PerturbationSolver, SolverError};
pub use specification::{ModelSpecification, SpecificationOptions};
