use crate::calibration::StepKind;
use crate::params::DerivedParameters;
use std::collections::HashMap;
use std::fmt::Write;

/// Renders the calibration ledger as an audit trace, one block per step.
///
/// Inputs produced by an earlier step are marked with a reference to that
/// step; anything else came from the calibrated parameters.
pub fn format_calibration_trace(derived: &DerivedParameters) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "AUDIT TRACE for steady-state calibration:");
    let _ = writeln!(output, "--------------------------------------------------");

    let mut produced_by: HashMap<&str, usize> = HashMap::new();
    for record in derived.records() {
        let tag = match record.kind {
            StepKind::SteadyState => "",
            StepKind::Intermediate => " (intermediate)",
        };
        let _ = writeln!(output, "[S{}] {} [{:.3}]{}", record.step, record.output, record.value, tag);

        for (i, (name, value)) in record.inputs.iter().enumerate() {
            let connector = if i == record.inputs.len() - 1 { "`--" } else { "|--" };
            match produced_by.get(name) {
                Some(step) => {
                    let _ = writeln!(output, "   {} {} [{:.3}] -> (Ref to S{})", connector, name, value, step);
                }
                None => {
                    let _ = writeln!(output, "   {} {} [{:.3}] -> Param", connector, name, value);
                }
            }
        }
        produced_by.insert(record.output, record.step);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::SteadyStateCalibrator;
    use crate::params::CalibratedParameters;

    #[test]
    fn test_trace_references_earlier_steps() {
        let derived = SteadyStateCalibrator::baseline()
            .unwrap()
            .calibrate(&CalibratedParameters::baseline())
            .unwrap();
        let trace = format_calibration_trace(&derived);
        let lines: Vec<&str> = trace.lines().collect();

        assert_eq!(lines[0], "AUDIT TRACE for steady-state calibration:");
        assert_eq!(lines[2], "[S1] Pi [1.005]");
        assert_eq!(lines[3], "   `-- Pistar [1.005] -> Param");
        assert!(trace.contains("   `-- Pi [1.005] -> (Ref to S1)"));
        assert!(trace.contains("K_per_L ["));
        assert!(trace.contains("(intermediate)"));
        assert_eq!(lines.iter().filter(|l| l.starts_with("[S")).count(), 14);
    }

    #[test]
    fn test_empty_ledger() {
        let trace = format_calibration_trace(&DerivedParameters::default());
        assert_eq!(trace.lines().count(), 2);
    }
}
