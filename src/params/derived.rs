//! Append-only ledger of steady-state values produced by the calibrator.

use crate::calibration::StepKind;
use serde::Serialize;

/// One executed calibration step: what it produced and what it read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRecord {
    /// 1-based position in the evaluation order.
    pub step: usize,
    pub output: &'static str,
    pub kind: StepKind,
    pub value: f64,
    pub inputs: Vec<(&'static str, f64)>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedParameters {
    records: Vec<StepRecord>,
}

impl DerivedParameters {
    /// Appends a record. Only the calibrator writes here, in step order.
    pub(crate) fn push(&mut self, record: StepRecord) {
        debug_assert!(self.get(record.output).is_none(), "step output '{}' written twice", record.output);
        self.records.push(record);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.records.iter().find(|r| r.output == name).map(|r| r.value)
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Steady-state values of model variables, in evaluation order.
    pub fn steady_states(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.records.iter().filter(|r| r.kind == StepKind::SteadyState).map(|r| (r.output, r.value))
    }

    /// Helper quantities (per-labor ratios) that are not merged into the parameter set.
    pub fn intermediates(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.records.iter().filter(|r| r.kind == StepKind::Intermediate).map(|r| (r.output, r.value))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
