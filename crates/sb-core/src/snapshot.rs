use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::variable::Variable;

/// Immutable view of every runtime variable at one point of a run.
///
/// Each variable sits behind its own `Arc`, so a script run that only touches
/// one variable shares the rest with the previous snapshot. History entries
/// hold snapshots directly; nothing ever mutates one in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableSnapshot {
    variables: Vec<Arc<Variable>>,
}

impl VariableSnapshot {
    /// Deep copy of the project's declared variables.
    pub fn from_declared(declared: &[Variable]) -> Self {
        Self {
            variables: declared.iter().cloned().map(Arc::new).collect(),
        }
    }

    pub fn from_shared(variables: Vec<Arc<Variable>>) -> Self {
        Self { variables }
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables
            .iter()
            .find(|variable| variable.name == name)
            .map(Arc::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Variable>> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// True when both snapshots share every variable allocation.
    pub fn ptr_eq(&self, other: &VariableSnapshot) -> bool {
        self.variables.len() == other.variables.len()
            && self
                .variables
                .iter()
                .zip(other.variables.iter())
                .all(|(left, right)| Arc::ptr_eq(left, right))
    }

    pub fn to_vec(&self) -> Vec<Variable> {
        self.variables
            .iter()
            .map(|variable| variable.as_ref().clone())
            .collect()
    }
}
