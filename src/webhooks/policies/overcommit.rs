//! Memory overcommit range policy.
//!
//! Validates:
//! - `spec.memory.overcommitPercent` is within 0..=100

use super::Violation;
use crate::crd::VirtualMachineInstancetypeSpec;

pub const REASON: &str = "InvalidOvercommitPercent";
pub const FIELD: &str = "spec.memory.overcommitPercent";

pub const MIN_OVERCOMMIT_PERCENT: i32 = 0;
pub const MAX_OVERCOMMIT_PERCENT: i32 = 100;

/// Validate the overcommit percentage range
pub fn validate(spec: &VirtualMachineInstancetypeSpec) -> Option<Violation> {
    let percent = spec.memory.overcommit_percent;

    if (MIN_OVERCOMMIT_PERCENT..=MAX_OVERCOMMIT_PERCENT).contains(&percent) {
        return None;
    }

    Some(Violation::new(
        REASON,
        FIELD,
        format!(
            "overcommit percent must be between {} and {} (got {})",
            MIN_OVERCOMMIT_PERCENT, MAX_OVERCOMMIT_PERCENT, percent
        ),
    ))
}
