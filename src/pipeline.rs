//! End-to-end entry points: calibrate, build, check, hand off.

use crate::calibration::SteadyStateCalibrator;
use crate::error::ModelError;
use crate::model::{EquationSet, Representation, VariableClassification};
use crate::oracle::{EquivalenceOracle, MismatchReport};
use crate::params::{CalibratedParameters, DerivedParameters, ResolvedParameters};
use crate::solver::{PerturbationSolver, SolverError};
use crate::specification::{ModelSpecification, SpecificationOptions};
use rayon::prelude::*;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Mismatch(#[from] MismatchReport),
}

/// Builds specifications of the baseline model for one calibration.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    calibrated: CalibratedParameters,
    options: SpecificationOptions,
    calibrator: SteadyStateCalibrator,
    variables: VariableClassification,
}

impl ModelBuilder {
    pub fn new(calibrated: CalibratedParameters, options: SpecificationOptions) -> Result<Self, ModelError> {
        Ok(Self {
            calibrated,
            options,
            calibrator: SteadyStateCalibrator::baseline()?,
            variables: VariableClassification::baseline(),
        })
    }

    pub fn baseline() -> Result<Self, ModelError> {
        Self::new(CalibratedParameters::baseline(), SpecificationOptions::default())
    }

    pub fn calibrated(&self) -> &CalibratedParameters {
        &self.calibrated
    }

    pub fn options(&self) -> &SpecificationOptions {
        &self.options
    }

    pub fn variables(&self) -> &VariableClassification {
        &self.variables
    }

    pub fn calibrate(&self) -> Result<DerivedParameters, ModelError> {
        self.calibrator.calibrate(&self.calibrated)
    }

    pub fn resolve(&self) -> Result<ResolvedParameters, ModelError> {
        let derived = self.calibrate()?;
        ResolvedParameters::merge(&self.calibrated, &derived)
    }

    pub fn build(&self, representation: Representation) -> Result<ModelSpecification, ModelError> {
        let params = self.resolve()?;
        self.assemble(representation, params)
    }

    /// Both representations from a single calibration run, as
    /// `(log-linear, nonlinear)`.
    pub fn build_both(&self) -> Result<(ModelSpecification, ModelSpecification), ModelError> {
        let params = self.resolve()?;
        let (loglinear, nonlinear) = rayon::join(
            || self.assemble(Representation::LogLinear, params.clone()),
            || self.assemble(Representation::Nonlinear, params.clone()),
        );
        Ok((loglinear?, nonlinear?))
    }

    /// Builds both representations and asks `oracle` whether they agree.
    pub fn check(&self, oracle: &impl EquivalenceOracle) -> Result<(), CheckError> {
        let (loglinear, nonlinear) = self.build_both()?;
        oracle.check_equivalent(&loglinear, &nonlinear)?;
        Ok(())
    }

    /// Hands the log-linear specification to `solver` with the configured
    /// output location.
    pub fn solve<S: PerturbationSolver>(&self, solver: &S) -> Result<S::Handle, SolverError> {
        let spec = self.build(Representation::LogLinear)?;
        solver.solve(&spec, spec.output_location())
    }

    fn assemble(
        &self,
        representation: Representation,
        params: ResolvedParameters,
    ) -> Result<ModelSpecification, ModelError> {
        let equations = EquationSet::build(representation, &self.variables, &params)?;
        ModelSpecification::assemble(equations, self.variables.clone(), params, &self.options)
    }
}

/// Builds one specification per calibration in parallel. Results keep the
/// order of `calibrations`, and one failure does not affect the others.
pub fn calibration_sweep(
    options: &SpecificationOptions,
    calibrations: &[CalibratedParameters],
    representation: Representation,
) -> Vec<Result<ModelSpecification, ModelError>> {
    let results: Vec<_> = calibrations
        .par_iter()
        .map(|calibrated| ModelBuilder::new(calibrated.clone(), options.clone())?.build(representation))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(runs = results.len(), failed, ?representation, "calibration sweep finished");
    results
}
