//! The hand-off to an external perturbation solver.
//!
//! This crate builds and checks specifications; it does not solve them. A
//! caller supplies a `PerturbationSolver` and receives whatever handle that
//! solver produces.

use crate::error::ModelError;
use crate::specification::ModelSpecification;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Solver rejected the specification: {0}")]
    Rejected(String),
    #[error("Solver failed: {0}")]
    Failed(String),
    #[error("Solver output could not be written: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Model(#[from] ModelError),
}

pub trait PerturbationSolver {
    /// Result handle of a successful solve.
    type Handle;

    /// Solves `spec`, persisting output under `output`. Only ever called with
    /// the log-linear specification.
    fn solve(&self, spec: &ModelSpecification, output: &Path) -> Result<Self::Handle, SolverError>;
}
