//! Validation policies for instance type admission.
//!
//! Every policy is a pure function over the decoded hub spec. Policies are
//! evaluated independently, so a single spec can report several violations.

pub mod hugepages;
pub mod overcommit;

use crate::crd::VirtualMachineInstancetypeSpec;

/// A single failed rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Machine-readable reason, e.g. `InvalidOvercommitPercent`
    pub reason: &'static str,
    /// Offending field path(s)
    pub field: &'static str,
    /// Human-readable explanation
    pub message: String,
}

impl Violation {
    pub fn new(reason: &'static str, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            reason,
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.reason, self.field, self.message)
    }
}

/// Run all validation policies, in a stable order.
pub fn validate_all(spec: &VirtualMachineInstancetypeSpec) -> Vec<Violation> {
    [overcommit::validate(spec), hugepages::validate(spec)]
        .into_iter()
        .flatten()
        .collect()
}
