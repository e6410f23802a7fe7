//! The baseline New-Keynesian model with capital: variables and equations.
pub mod bindings;
pub mod classification;
pub mod equations;

pub use bindings::{ParameterBindings, SteadyStateBindings, ZeroDeviationBindings};
pub use classification::{Role, VariableClassification};
pub use equations::{Equation, EquationSet, Relationship, Representation};
