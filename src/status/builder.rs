//! # Status Builder
//!
//! Accumulates conditions, operand versions and related objects into a
//! [`ClusterOperatorStatus`].
//!
//! The builder is an owned value: every operation consumes it and hands it
//! back, and [`StatusBuilder::build`] consumes it for good. Seed it with
//! [`StatusBuilder::from_status`] so conditions whose status does not change
//! keep their original `lastTransitionTime`.

use crate::crd::{ClusterOperatorStatus, Condition, ConditionStatus, ObjectReference, OperandVersion};
use chrono::{DateTime, SubsecRound, Utc};

/// Builder for a ClusterOperator status document
#[must_use]
#[derive(Debug, Clone, Default)]
pub struct StatusBuilder {
    status: ClusterOperatorStatus,
}

impl StatusBuilder {
    /// Start from an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously observed document
    pub fn from_status(status: &ClusterOperatorStatus) -> Self {
        Self {
            status: status.clone(),
        }
    }

    /// Set a condition
    ///
    /// - absent: inserted with `lastTransitionTime = now`
    /// - same status: reason and message updated in place, timestamp kept
    /// - different status: replaced, `lastTransitionTime = now`
    pub fn set_condition(
        mut self,
        condition_type: &str,
        status: ConditionStatus,
        reason: &str,
        message: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let now = now.trunc_subsecs(0);
        match self
            .status
            .conditions
            .iter_mut()
            .find(|c| c.r#type == condition_type)
        {
            Some(existing) => {
                if existing.status != status {
                    existing.status = status;
                    existing.last_transition_time = now;
                }
                if existing.reason != reason {
                    existing.reason = reason.to_string();
                }
                if existing.message != message {
                    existing.message = message.to_string();
                }
            }
            None => self.status.conditions.push(Condition {
                r#type: condition_type.to_string(),
                status,
                last_transition_time: now,
                reason: reason.to_string(),
                message: message.to_string(),
            }),
        }
        self
    }

    /// Set a condition only if no condition of that type exists yet
    pub fn ensure_condition(
        self,
        condition_type: &str,
        status: ConditionStatus,
        reason: &str,
        message: &str,
        now: DateTime<Utc>,
    ) -> Self {
        if self.condition(condition_type).is_some() {
            return self;
        }
        self.set_condition(condition_type, status, reason, message, now)
    }

    /// Upsert an operand version by name
    pub fn set_version(mut self, name: &str, version: &str) -> Self {
        match self.status.versions.iter_mut().find(|v| v.name == name) {
            Some(existing) => existing.version = version.to_string(),
            None => self.status.versions.push(OperandVersion {
                name: name.to_string(),
                version: version.to_string(),
            }),
        }
        self
    }

    /// Remove an operand version by name
    pub fn remove_version(mut self, name: &str) -> Self {
        self.status.versions.retain(|v| v.name != name);
        self
    }

    /// Add a related object unless an identical reference is already present
    pub fn add_related_object(mut self, reference: ObjectReference) -> Self {
        if !self.status.related_objects.contains(&reference) {
            self.status.related_objects.push(reference);
        }
        self
    }

    /// Remove a related object reference
    pub fn remove_related_object(mut self, reference: &ObjectReference) -> Self {
        self.status.related_objects.retain(|r| r != reference);
        self
    }

    /// Current condition of the given type in the document under construction
    pub fn condition(&self, condition_type: &str) -> Option<&Condition> {
        self.status
            .conditions
            .iter()
            .find(|c| c.r#type == condition_type)
    }

    /// Finish the document
    pub fn build(self) -> ClusterOperatorStatus {
        self.status
    }
}
