use super::recipe::{Step, BASELINE_RECIPE};
use crate::analysis::topology;
use crate::error::ModelError;
use crate::params::{CalibratedParameters, DerivedParameters, StepRecord};
use tracing::{debug, info};

/// Runs a steady-state recipe against calibrated parameters.
///
/// The recipe's dependency order is verified once, at construction. Each call
/// to `calibrate` is pure: identical inputs give identical ledgers.
#[derive(Debug, Clone)]
pub struct SteadyStateCalibrator {
    steps: Vec<Step>,
}

impl SteadyStateCalibrator {
    pub fn new(steps: Vec<Step>) -> Result<Self, ModelError> {
        topology::verify_recipe(&steps)?;
        Ok(Self { steps })
    }

    pub fn baseline() -> Result<Self, ModelError> {
        Self::new(BASELINE_RECIPE.to_vec())
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn calibrate(&self, calibrated: &CalibratedParameters) -> Result<DerivedParameters, ModelError> {
        calibrated.validate()?;

        let mut derived = DerivedParameters::default();
        let mut args = Vec::with_capacity(8);

        for (i, step) in self.steps.iter().enumerate() {
            let number = i + 1;

            // 1. Gather inputs: earlier outputs first, then calibrated values.
            args.clear();
            let mut inputs = Vec::with_capacity(step.inputs.len());
            for &input in step.inputs {
                let value = derived
                    .get(input)
                    .or_else(|| calibrated.get(input))
                    .ok_or(ModelError::StepInputMissing { step: number, output: step.output, input })?;
                args.push(value);
                inputs.push((input, value));
            }

            // 2. Evaluate and check the post-condition.
            let value = (step.formula)(&args)
                .map_err(|detail| ModelError::StepDomain { step: number, output: step.output, detail })?;
            if !value.is_finite() {
                return Err(ModelError::StepDomain {
                    step: number,
                    output: step.output,
                    detail: format!("non-finite result {}", value),
                });
            }
            if !step.domain.holds(value) {
                return Err(ModelError::StepDomain {
                    step: number,
                    output: step.output,
                    detail: format!("value {} must be {}", value, step.domain.describe()),
                });
            }

            debug!(step = number, output = step.output, value, "steady-state step");
            derived.push(StepRecord { step: number, output: step.output, kind: step.kind, value, inputs });
        }

        info!(steps = derived.len(), "steady state calibrated");
        Ok(derived)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{Domain, StepKind};
    use rstest::rstest;

    fn calibrate(p: &CalibratedParameters) -> Result<DerivedParameters, ModelError> {
        SteadyStateCalibrator::baseline().unwrap().calibrate(p)
    }

    #[test]
    fn test_baseline_scenario() {
        let d = calibrate(&CalibratedParameters::baseline()).unwrap();
        let beta = 0.96f64.powf(0.25);
        let pistar = 1.02f64.powf(0.25);

        assert!((d.get("R").unwrap() - 1.0 / beta).abs() < 1e-12);
        assert!((d.get("R").unwrap() - 1.0103).abs() < 1e-4);
        assert!((d.get("I").unwrap() - pistar / beta).abs() < 1e-12);
        assert_eq!(d.get("Pi"), Some(pistar));
        for name in ["K", "L", "C", "Y", "W", "Omega"] {
            assert!(d.get(name).unwrap() > 0.0, "{} must be positive", name);
        }
        let mc = d.get("MC").unwrap();
        assert!(mc > 0.0 && mc < 1.0);
    }

    #[test]
    fn test_levels_are_consistent_with_ratios() {
        let d = calibrate(&CalibratedParameters::baseline()).unwrap();
        let (k, y, c, l) = (d.get("K").unwrap(), d.get("Y").unwrap(), d.get("C").unwrap(), d.get("L").unwrap());
        assert!((k / l - d.get("K_per_L").unwrap()).abs() < 1e-12);
        // Resource constraint at rest: C = Y - DELTA * K.
        assert!((c - (y - 0.1 * k)).abs() < 1e-12);
        assert!((d.get("Omega").unwrap() - y * (1.0 - d.get("MC").unwrap())).abs() < 1e-12);
    }

    #[test]
    fn test_records_follow_recipe_order_and_inputs() {
        let d = calibrate(&CalibratedParameters::baseline()).unwrap();
        let outputs: Vec<_> = d.records().iter().map(|r| r.output).collect();
        let expected: Vec<_> = BASELINE_RECIPE.iter().map(|s| s.output).collect();
        assert_eq!(outputs, expected);

        let i_record = &d.records()[4];
        assert_eq!(i_record.output, "I");
        assert_eq!(i_record.inputs.iter().map(|(n, _)| *n).collect::<Vec<_>>(), vec!["R", "Pi"]);
        assert_eq!(d.intermediates().count(), 3);
        assert_eq!(d.steady_states().count(), 11);
    }

    #[test]
    fn test_deterministic() {
        let p = CalibratedParameters::baseline();
        assert_eq!(calibrate(&p).unwrap(), calibrate(&p).unwrap());
    }

    #[rstest]
    #[case(0.0)]
    #[case(1.0)]
    fn test_capital_share_bounds_fail(#[case] alpha: f64) {
        let err = calibrate(&CalibratedParameters::baseline().with("ALPHA", alpha)).unwrap_err();
        assert!(matches!(err, ModelError::ParameterDomain { ref name, .. } if name == "ALPHA"), "{:?}", err);
    }

    #[test]
    fn test_negative_marginal_cost_fails_at_its_step() {
        // Deflation deep enough to push MC below zero.
        let p = CalibratedParameters::baseline().with("Pistar", 0.5).with("MU", 10_000.0);
        match calibrate(&p).unwrap_err() {
            ModelError::StepDomain { step, output, .. } => {
                assert_eq!(step, 2);
                assert_eq!(output, "MC");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[rstest]
    #[case(0.99, 1.0)]
    #[case(0.95, 1.0)]
    #[case(0.01, 1.0)]
    fn test_consumption_ratio_stays_positive_at_full_depreciation(#[case] alpha: f64, #[case] delta: f64) {
        // c = k * ((R - 1 + DELTA) / (MC * ALPHA) - DELTA) with R > 1, MC < 1 and ALPHA < 1.
        let p = CalibratedParameters::baseline().with("ALPHA", alpha).with("DELTA", delta);
        let d = calibrate(&p).unwrap();
        let (y, k, c) = (d.get("Y_per_L").unwrap(), d.get("K_per_L").unwrap(), d.get("C_per_L").unwrap());
        assert!(c > 0.0);
        assert!((c - (y - delta * k)).abs() <= 1e-12 * y);
    }

    #[test]
    fn test_non_finite_output_fails() {
        let steps = vec![Step {
            output: "X",
            inputs: &["BETA"],
            kind: StepKind::Intermediate,
            domain: Domain::Positive,
            formula: |x| Ok(x[0] / 0.0),
        }];
        let err = SteadyStateCalibrator::new(steps).unwrap().calibrate(&CalibratedParameters::baseline()).unwrap_err();
        assert!(matches!(err, ModelError::StepDomain { step: 1, output: "X", .. }), "{:?}", err);
    }

    #[test]
    fn test_unknown_input_fails_at_runtime() {
        let steps = vec![Step {
            output: "X",
            inputs: &["ZETA"],
            kind: StepKind::Intermediate,
            domain: Domain::Positive,
            formula: |x| Ok(x[0]),
        }];
        let err = SteadyStateCalibrator::new(steps).unwrap().calibrate(&CalibratedParameters::baseline()).unwrap_err();
        assert_eq!(err, ModelError::StepInputMissing { step: 1, output: "X", input: "ZETA" });
    }
}
