//! The partition of model variables into states, controls and shocks.

use crate::error::ModelError;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    /// Predetermined, carried over from the previous period.
    State,
    /// Determined within the period.
    Control,
    /// Exogenous disturbance.
    Shock,
}

/// Three disjoint, ordered name sequences. Order is significant: the solver
/// lays out its state vectors in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableClassification {
    states: Vec<String>,
    controls: Vec<String>,
    shocks: Vec<String>,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl VariableClassification {
    pub fn new(states: Vec<String>, controls: Vec<String>, shocks: Vec<String>) -> Result<Self, ModelError> {
        let mut seen = HashSet::new();
        for name in states.iter().chain(&controls).chain(&shocks) {
            if !seen.insert(name.as_str()) {
                return Err(ModelError::DuplicateClassification { name: name.clone() });
            }
        }
        Ok(Self { states, controls, shocks })
    }

    /// Productivity and capital are predetermined; the monetary-policy
    /// innovation is the only exogenous disturbance.
    pub fn baseline() -> Self {
        Self {
            states: owned(&["A", "K"]),
            controls: owned(&["C", "R", "W", "L", "Y", "MC", "Omega", "I", "Pi"]),
            shocks: owned(&["epsilon_I"]),
        }
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn controls(&self) -> &[String] {
        &self.controls
    }

    pub fn shocks(&self) -> &[String] {
        &self.shocks
    }

    /// States then controls.
    pub fn endogenous(&self) -> impl Iterator<Item = &String> {
        self.states.iter().chain(&self.controls)
    }

    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.endogenous().chain(&self.shocks)
    }

    pub fn endogenous_count(&self) -> usize {
        self.states.len() + self.controls.len()
    }

    pub fn role(&self, name: &str) -> Option<Role> {
        if self.states.iter().any(|s| s == name) {
            Some(Role::State)
        } else if self.controls.iter().any(|s| s == name) {
            Some(Role::Control)
        } else if self.shocks.iter().any(|s| s == name) {
            Some(Role::Shock)
        } else {
            None
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.role(name).is_some()
    }
}
