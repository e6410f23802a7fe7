use dsge_model_core::expr::Expr;
use dsge_model_core::model::{SteadyStateBindings, ZeroDeviationBindings};
use dsge_model_core::{
    calibration_sweep, CalibratedParameters, CheckError, EquivalenceOracle, FirstOrderOracle, ModelBuilder,
    ModelError, ModelSpecification, PerturbationSolver, Representation, SolverError, SpecificationOptions,
};
use rstest::rstest;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

fn builder(calibrated: CalibratedParameters) -> ModelBuilder {
    ModelBuilder::new(calibrated, SpecificationOptions::default()).unwrap()
}

fn alternative_calibrations() -> Vec<CalibratedParameters> {
    let base = CalibratedParameters::baseline();
    vec![
        base.clone(),
        base.clone().with("GAMMA", 2.0).with("ETA", 0.5),
        base.clone().with("ALPHA", 0.36).with("DELTA", 0.025),
        base.clone().with("BETA", 0.99).with("Pistar", 1.0),
        base.with("SIGMA", 11.0).with("MU", 60.0).with("PHIpi", 2.0),
    ]
}

#[test]
fn test_steady_state_satisfies_every_nonlinear_equation() {
    for calibrated in alternative_calibrations() {
        let spec = builder(calibrated).build(Representation::Nonlinear).unwrap();
        let at_ss = SteadyStateBindings { params: spec.parameters(), classification: spec.variables() };
        for (i, eq) in spec.equations().iter().enumerate() {
            let residual = eq.evaluate_residual(&at_ss).unwrap();
            assert!(residual.abs() < 1e-9, "equation {} ({}) residual {}", i, eq.label, residual);
        }
    }
}

#[test]
fn test_loglinear_rests_at_zero_deviation() {
    for calibrated in alternative_calibrations() {
        let spec = builder(calibrated).build(Representation::LogLinear).unwrap();
        let at_rest = ZeroDeviationBindings { params: spec.parameters(), classification: spec.variables() };
        for eq in spec.equations() {
            assert_eq!(eq.evaluate_residual(&at_rest).unwrap().abs(), 0.0, "{}", eq);
            assert!(eq.linear_form(spec.parameters()).is_ok(), "{}", eq);
        }
    }
}

#[test]
fn test_building_is_deterministic() {
    let b = ModelBuilder::baseline().unwrap();
    let first = b.build_both().unwrap();
    let second = b.build_both().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.0.to_json().unwrap(), second.0.to_json().unwrap());
}

#[rstest]
#[case(0.0)]
#[case(1.0)]
fn test_degenerate_capital_share_fails(#[case] alpha: f64) {
    let err = builder(CalibratedParameters::baseline().with("ALPHA", alpha))
        .build(Representation::Nonlinear)
        .unwrap_err();
    match err {
        ModelError::ParameterDomain { name, value, .. } => {
            assert_eq!(name, "ALPHA");
            assert_eq!(value, alpha);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_baseline_scenario() {
    let params = ModelBuilder::baseline().unwrap().resolve().unwrap();
    let r = params.get("R").unwrap();
    assert!((r - 1.0 / 0.96f64.powf(0.25)).abs() < 1e-12);
    assert!((r - 1.0103).abs() < 1e-4);
    let i = params.get("I").unwrap();
    assert!((i - r * 1.02f64.powf(0.25)).abs() < 1e-12);
    for name in ["K", "L", "C", "Y"] {
        assert!(params.get(name).unwrap() > 0.0, "{} must be positive", name);
    }
    assert!(params.get("K_per_L").is_none());
}

#[rstest]
#[case(Representation::LogLinear)]
#[case(Representation::Nonlinear)]
fn test_equation_count_parity(#[case] representation: Representation) {
    let spec = ModelBuilder::baseline().unwrap().build(representation).unwrap();
    let relationships: BTreeSet<_> = spec.equations().iter().map(|eq| eq.relationship).collect();
    assert_eq!(spec.equations().len(), 11);
    assert_eq!(spec.equations().len(), spec.variables().endogenous_count());
    assert_eq!(relationships.len(), 10);
}

#[test]
fn test_variable_partition_closes_every_reference() {
    let (ll, nl) = ModelBuilder::baseline().unwrap().build_both().unwrap();
    let names: Vec<&String> = ll.variables().all().collect();
    let unique: BTreeSet<&String> = names.iter().copied().collect();
    assert_eq!(names.len(), unique.len());

    for spec in [&ll, &nl] {
        for eq in spec.equations() {
            let mut visit = |leaf: &Expr| match leaf {
                Expr::Var(v) => assert!(spec.variables().contains(&v.name), "{}", v),
                Expr::Param(p) | Expr::SteadyState(p) => assert!(spec.parameters().get(p).is_some(), "{}", p),
                _ => {}
            };
            eq.lhs.for_each_leaf(&mut visit);
            eq.rhs.for_each_leaf(&mut visit);
        }
    }
}

#[test]
fn test_representations_agree_to_first_order() {
    let oracle = FirstOrderOracle::default();
    for calibrated in alternative_calibrations() {
        assert_eq!(builder(calibrated).check(&oracle), Ok(()));
    }
}

#[rstest]
#[case(1e-3)]
#[case(1e3)]
#[case(1e6)]
fn test_check_holds_across_productivity_levels(#[case] abar: f64) {
    let b = builder(CalibratedParameters::baseline().with("Abar", abar));
    assert_eq!(b.check(&FirstOrderOracle::default()), Ok(()));
}

#[test]
fn test_oracle_rejects_mismatched_calibrations() {
    let (ll, _) = ModelBuilder::baseline().unwrap().build_both().unwrap();
    let nl = builder(CalibratedParameters::baseline().with("DELTA", 0.05))
        .build(Representation::Nonlinear)
        .unwrap();
    let report = FirstOrderOracle::default().check_equivalent(&ll, &nl).unwrap_err();
    assert!(!report.structural.is_empty());
}

struct RecordingSolver;

impl PerturbationSolver for RecordingSolver {
    type Handle = PathBuf;

    fn solve(&self, spec: &ModelSpecification, output: &Path) -> Result<PathBuf, SolverError> {
        if !spec.is_loglinear() {
            return Err(SolverError::Rejected("expected the log-linear specification".into()));
        }
        let path = output.join("specification.json");
        fs::write(&path, spec.to_json()?)?;
        Ok(path)
    }
}

#[test]
fn test_solve_hands_loglinear_spec_to_solver() {
    let dir = tempfile::tempdir().unwrap();
    let options = SpecificationOptions { output_location: dir.path().to_path_buf(), ..Default::default() };
    let builder = ModelBuilder::new(CalibratedParameters::baseline(), options).unwrap();

    let path = builder.solve(&RecordingSolver).unwrap();
    assert_eq!(path.parent(), Some(dir.path()));

    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["representation"], "LogLinear");
    assert_eq!(written["irf_shocks"][1], "epsilon_I");
    assert_eq!(written["log_variables"].as_array().unwrap().len(), 0);
}

#[test]
fn test_solve_propagates_model_errors() {
    let b = builder(CalibratedParameters::baseline().with("BETA", 1.0));
    let err = b.solve(&RecordingSolver).unwrap_err();
    assert!(matches!(err, SolverError::Model(ModelError::ParameterDomain { .. })));
}

#[test]
fn test_check_reports_mismatch_from_oracle() {
    struct Refuse;
    impl EquivalenceOracle for Refuse {
        fn check_equivalent(
            &self,
            _: &ModelSpecification,
            _: &ModelSpecification,
        ) -> Result<(), dsge_model_core::MismatchReport> {
            Err(dsge_model_core::MismatchReport { structural: vec!["refused".into()], equations: Vec::new() })
        }
    }
    let err = ModelBuilder::baseline().unwrap().check(&Refuse).unwrap_err();
    assert!(matches!(err, CheckError::Mismatch(report) if report.structural == ["refused"]));
}

#[test]
fn test_sweep_matches_sequential_builds() {
    let calibrations = alternative_calibrations();
    let swept = calibration_sweep(&SpecificationOptions::default(), &calibrations, Representation::LogLinear);
    for (calibrated, result) in calibrations.into_iter().zip(swept) {
        let sequential = builder(calibrated).build(Representation::LogLinear).unwrap();
        assert_eq!(result.unwrap(), sequential);
    }
}

#[test]
fn test_json_configuration() {
    let calibrated = CalibratedParameters::from_json(
        r#"{"GAMMA": 1.0, "BETA": 0.99, "ETA": 2.0, "ALPHA": 0.3, "RHO_A": 0.95, "Abar": 1.0,
            "Pistar": 1.0, "PHIpi": 1.5, "MU": 100.0, "SIGMA": 8.0, "DELTA": 0.1}"#,
    )
    .unwrap();
    let options = SpecificationOptions::from_json(r#"{"headline_variables": ["Y", "C"]}"#).unwrap();
    let spec = ModelBuilder::new(calibrated, options).unwrap().build(Representation::Nonlinear).unwrap();
    assert_eq!(spec.headline_variables(), ["Y".to_string(), "C".to_string()]);
    assert!((spec.parameters().get("R").unwrap() - 1.0 / 0.99).abs() < 1e-12);

    let bad = SpecificationOptions::from_json(r#"{"irf_shocks": 3}"#).unwrap_err();
    assert!(matches!(bad, ModelError::InvalidConfiguration(_)));
}
