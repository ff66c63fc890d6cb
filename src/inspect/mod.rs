//! # Child Inspection
//!
//! Classifies child resources by their reported condition and folds the
//! result into a fleet verdict.
//!
//! Each child lands in exactly one bucket:
//!
//! - **healthy** - the designated condition has the success status
//! - **failing** - the designated condition exists with any other status
//! - **pending** - the designated condition has not been reported yet
//!
//! Pending children are not failures, but they do keep the fleet from being
//! reported as all healthy. Buckets keep the input order so failure messages
//! are reproducible.

use crate::crd::{Condition, ConditionStatus, PlatformOperator};
use crate::status::condition::find_status_condition;

/// Condition type PlatformOperators report once their bundle is applied
pub const APPLIED_CONDITION_TYPE: &str = "Applied";

/// Read-only view of a child resource
pub trait ChildResourceView {
    fn name(&self) -> &str;
    fn conditions(&self) -> &[Condition];
}

/// Owned point-in-time copy of a child resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildSnapshot {
    pub name: String,
    pub conditions: Vec<Condition>,
}

impl ChildResourceView for ChildSnapshot {
    fn name(&self) -> &str {
        &self.name
    }

    fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

impl ChildResourceView for PlatformOperator {
    fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    fn conditions(&self) -> &[Condition] {
        self.status
            .as_ref()
            .map(|status| status.conditions.as_slice())
            .unwrap_or_default()
    }
}

impl From<&PlatformOperator> for ChildSnapshot {
    fn from(operator: &PlatformOperator) -> Self {
        Self {
            name: operator.name().to_string(),
            conditions: operator.conditions().to_vec(),
        }
    }
}

/// Which condition marks a child as healthy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessCriteria {
    pub condition_type: String,
    pub success_status: ConditionStatus,
}

impl SuccessCriteria {
    pub fn new(condition_type: &str, success_status: ConditionStatus) -> Self {
        Self {
            condition_type: condition_type.to_string(),
            success_status,
        }
    }

    /// `Applied=True` on a PlatformOperator
    pub fn platform_operator_applied() -> Self {
        Self::new(APPLIED_CONDITION_TYPE, ConditionStatus::True)
    }
}

/// Classification of a single child
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildState {
    Healthy,
    NoStatusYet,
    Failing { reason: String },
}

/// A child whose designated condition reports failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailingChild {
    pub name: String,
    pub reason: String,
}

/// Children sorted into buckets, each in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildHealthReport {
    pub healthy: Vec<String>,
    pub pending: Vec<String>,
    pub failing: Vec<FailingChild>,
}

/// Aggregate verdict over a set of children
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FleetVerdict {
    /// No pending and no failing children (including no children at all)
    AllHealthy,
    /// No failures, but some children have not reported yet
    Pending { pending: Vec<String> },
    /// At least one child is failing
    HasFailures { failing: Vec<FailingChild> },
}

impl ChildHealthReport {
    pub fn total(&self) -> usize {
        self.healthy.len() + self.pending.len() + self.failing.len()
    }

    /// Fold the buckets into a verdict; failures take precedence over pending
    pub fn verdict(&self) -> FleetVerdict {
        if !self.failing.is_empty() {
            FleetVerdict::HasFailures {
                failing: self.failing.clone(),
            }
        } else if !self.pending.is_empty() {
            FleetVerdict::Pending {
                pending: self.pending.clone(),
            }
        } else {
            FleetVerdict::AllHealthy
        }
    }
}

/// Classify one child against the success criteria
pub fn classify_child<C>(child: &C, criteria: &SuccessCriteria) -> ChildState
where
    C: ChildResourceView + ?Sized,
{
    match find_status_condition(child.conditions(), &criteria.condition_type) {
        None => ChildState::NoStatusYet,
        Some(condition) if condition.status == criteria.success_status => ChildState::Healthy,
        Some(condition) => ChildState::Failing {
            reason: condition.reason.clone(),
        },
    }
}

/// Classify every child, preserving input order within each bucket
pub fn inspect_children<C>(children: &[C], criteria: &SuccessCriteria) -> ChildHealthReport
where
    C: ChildResourceView,
{
    children
        .iter()
        .fold(ChildHealthReport::default(), |mut report, child| {
            let name = child.name().to_string();
            match classify_child(child, criteria) {
                ChildState::Healthy => report.healthy.push(name),
                ChildState::NoStatusYet => report.pending.push(name),
                ChildState::Failing { reason } => report.failing.push(FailingChild { name, reason }),
            }
            report
        })
}
