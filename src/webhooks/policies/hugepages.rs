//! Hugepages / overcommit exclusivity policy.
//!
//! Hugepage-backed guest memory is allocated up front and cannot be
//! overcommitted, so a positive `overcommitPercent` is rejected whenever
//! `hugepages` is set.

use super::Violation;
use crate::crd::VirtualMachineInstancetypeSpec;

pub const REASON: &str = "OvercommitWithHugepages";
pub const FIELD: &str = "spec.memory.overcommitPercent, spec.memory.hugepages";

/// Validate that overcommit and hugepages are not requested together
pub fn validate(spec: &VirtualMachineInstancetypeSpec) -> Option<Violation> {
    let memory = &spec.memory;

    let Some(hugepages) = &memory.hugepages else {
        return None;
    };

    if memory.overcommit_percent <= 0 {
        return None;
    }

    Some(Violation::new(
        REASON,
        FIELD,
        format!(
            "memory overcommit and hugepages are mutually exclusive \
             (overcommitPercent {} with pageSize {})",
            memory.overcommit_percent, hugepages.page_size
        ),
    ))
}
