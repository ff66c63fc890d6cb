//! # Default Status Content
//!
//! Conditions, versions and related objects every ClusterOperator managed by
//! this controller carries.

use super::builder::StatusBuilder;
use super::condition::{condition_types, reasons};
use crate::crd::{ConditionStatus, ObjectReference};
use chrono::{DateTime, Utc};

/// Operand name under which the controller reports its own version
pub const OPERATOR_VERSION_NAME: &str = "operator";

/// Default conditions: Progressing=True, Degraded=False, Available=False
///
/// Conditions are only inserted when missing so a document seeded from the
/// previous pass keeps its conditions and timestamps. The operator version is
/// always set.
pub fn set_default_status_conditions(
    builder: StatusBuilder,
    release_version: &str,
    now: DateTime<Utc>,
) -> StatusBuilder {
    builder
        .ensure_condition(
            condition_types::PROGRESSING,
            ConditionStatus::True,
            "",
            "",
            now,
        )
        .ensure_condition(condition_types::DEGRADED, ConditionStatus::False, "", "", now)
        .ensure_condition(
            condition_types::AVAILABLE,
            ConditionStatus::False,
            reasons::AWAITING_AVAILABILITY_CHECK,
            "Waiting for the first availability check to complete",
            now,
        )
        .set_version(OPERATOR_VERSION_NAME, release_version)
}

/// Related objects for a ClusterOperator
///
/// `include_bundles` adds the rukpak bundle resources the core operator
/// drives.
pub fn set_default_related_objects(
    builder: StatusBuilder,
    namespace: &str,
    include_bundles: bool,
) -> StatusBuilder {
    let builder = builder
        .add_related_object(ObjectReference::new("", "namespaces", "", namespace))
        .add_related_object(ObjectReference::new(
            "platform.openshift.io",
            "platformoperators",
            "",
            "",
        ));

    if !include_bundles {
        return builder;
    }

    builder
        .add_related_object(ObjectReference::new("core.rukpak.io", "bundles", "", ""))
        .add_related_object(ObjectReference::new(
            "core.rukpak.io",
            "bundledeployments",
            "",
            "",
        ))
}
