//! # Condition Helpers
//!
//! Well-known condition types and reasons, plus lookup helpers over a
//! condition list.

use crate::crd::{Condition, ConditionStatus};

/// Well-known ClusterOperator condition types.
pub mod condition_types {
    pub const AVAILABLE: &str = "Available";
    pub const PROGRESSING: &str = "Progressing";
    pub const DEGRADED: &str = "Degraded";
    pub const UPGRADEABLE: &str = "Upgradeable";
}

/// Reason tokens written by this controller.
pub mod reasons {
    pub const AS_EXPECTED: &str = "AsExpected";
    pub const AWAITING_AVAILABILITY_CHECK: &str = "AwaitingAvailabilityCheck";
    pub const AVAILABILITY_CHECK_FAILED: &str = "AvailabilityCheckFailed";
    pub const EXCEEDED_UNAVAILABILITY_THRESHOLD: &str = "ExceededUnavailabilityThreshold";
    pub const NO_POS_FOUND: &str = "NoPOsFound";
    pub const POS_HEALTHY: &str = "POsHealthy";
    pub const PO_ERROR: &str = "POError";
    pub const PO_PENDING: &str = "POPending";
    pub const APPLY_PENDING: &str = "ApplyPending";
}

/// Find the condition of the given type
pub fn find_status_condition<'a>(
    conditions: &'a [Condition],
    condition_type: &str,
) -> Option<&'a Condition> {
    conditions.iter().find(|c| c.r#type == condition_type)
}

/// Whether the condition of the given type exists and has the given status
pub fn is_status_condition(
    conditions: &[Condition],
    condition_type: &str,
    status: ConditionStatus,
) -> bool {
    find_status_condition(conditions, condition_type).is_some_and(|c| c.status == status)
}
