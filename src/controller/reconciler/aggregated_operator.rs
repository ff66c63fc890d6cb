//! # Aggregated ClusterOperator
//!
//! Folds the health of every PlatformOperator into one ClusterOperator.

use super::types::{commit_status, PassOutcome, ReconcilerError};
use crate::config::ControllerConfig;
use crate::crd::ConditionStatus;
use crate::inspect::{inspect_children, FailingChild, FleetVerdict, SuccessCriteria};
use crate::status::condition::{condition_types, reasons};
use crate::status::defaults::{set_default_related_objects, set_default_status_conditions};
use crate::status::{StatusBuilder, StatusWriter};
use crate::store::{ChildLister, Clock, StatusStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const NO_POS_MESSAGE: &str = "No POs are present in the cluster";
const POS_HEALTHY_MESSAGE: &str = "All POs in a successful state";

pub struct AggregatedReconciler {
    store: Arc<dyn StatusStore>,
    lister: Arc<dyn ChildLister>,
    clock: Arc<dyn Clock>,
    criteria: SuccessCriteria,
    release_version: String,
    system_namespace: String,
}

impl std::fmt::Debug for AggregatedReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregatedReconciler")
            .field("criteria", &self.criteria)
            .field("system_namespace", &self.system_namespace)
            .finish_non_exhaustive()
    }
}

impl AggregatedReconciler {
    pub fn new(
        config: &ControllerConfig,
        store: Arc<dyn StatusStore>,
        lister: Arc<dyn ChildLister>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            lister,
            clock,
            criteria: SuccessCriteria::platform_operator_applied(),
            release_version: config.release_version.clone(),
            system_namespace: config.system_namespace.clone(),
        }
    }

    /// One pass over the named aggregated ClusterOperator
    ///
    /// A missing ClusterOperator is left alone; a failed child listing ends the
    /// pass without writing.
    pub async fn reconcile(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<PassOutcome, ReconcilerError> {
        let Some(existing) = self.store.get(name).await? else {
            debug!("Aggregated ClusterOperator {} not found, nothing to do", name);
            return Ok(PassOutcome::Missing);
        };

        let now = self.clock.now();
        let previous = existing.status.clone().unwrap_or_default();
        let builder = set_default_status_conditions(
            StatusBuilder::from_status(&previous),
            &self.release_version,
            now,
        );
        let builder = set_default_related_objects(builder, &self.system_namespace, false);

        let children = self.lister.list_children().await?;
        let builder = if children.is_empty() {
            info!("No PlatformOperators found");
            no_children(builder, now)
        } else {
            let report = inspect_children(&children, &self.criteria);
            info!(
                "Inspected {} PlatformOperators: {} healthy, {} pending, {} failing",
                report.total(),
                report.healthy.len(),
                report.pending.len(),
                report.failing.len()
            );
            apply_verdict(builder, &report.verdict(), now)
        };

        let writer = StatusWriter::new(self.store.as_ref());
        commit_status(&writer, &existing, builder.build(), cancel).await?;
        Ok(PassOutcome::Settled)
    }
}

fn no_children(builder: StatusBuilder, now: DateTime<Utc>) -> StatusBuilder {
    builder
        .set_condition(
            condition_types::AVAILABLE,
            ConditionStatus::True,
            reasons::NO_POS_FOUND,
            NO_POS_MESSAGE,
            now,
        )
        .set_condition(
            condition_types::PROGRESSING,
            ConditionStatus::False,
            reasons::NO_POS_FOUND,
            NO_POS_MESSAGE,
            now,
        )
        .set_condition(condition_types::DEGRADED, ConditionStatus::False, "", "", now)
}

fn apply_verdict(builder: StatusBuilder, verdict: &FleetVerdict, now: DateTime<Utc>) -> StatusBuilder {
    let (available, progressing) = match verdict {
        FleetVerdict::AllHealthy => (
            (ConditionStatus::True, reasons::POS_HEALTHY, POS_HEALTHY_MESSAGE.to_string()),
            (ConditionStatus::False, reasons::POS_HEALTHY, POS_HEALTHY_MESSAGE.to_string()),
        ),
        FleetVerdict::HasFailures { failing } => (
            (ConditionStatus::False, reasons::PO_ERROR, failure_message(failing)),
            (ConditionStatus::True, "", String::new()),
        ),
        FleetVerdict::Pending { pending } => (
            (ConditionStatus::False, reasons::PO_PENDING, pending_message(pending)),
            (ConditionStatus::True, "", String::new()),
        ),
    };

    builder
        .set_condition(condition_types::AVAILABLE, available.0, available.1, &available.2, now)
        .set_condition(
            condition_types::PROGRESSING,
            progressing.0,
            progressing.1,
            &progressing.2,
            now,
        )
        .set_condition(condition_types::DEGRADED, ConditionStatus::False, "", "", now)
}

/// Single failure: its message; several: `[m1, m2]` in input order
fn failure_message(failing: &[FailingChild]) -> String {
    join_messages(
        failing
            .iter()
            .map(|child| {
                format!(
                    "encountered the failing {} platform operator with reason {:?}",
                    child.name, child.reason
                )
            })
            .collect(),
    )
}

fn pending_message(pending: &[String]) -> String {
    join_messages(
        pending
            .iter()
            .map(|name| {
                format!(
                    "waiting on the {} platform operator with reason {:?}",
                    name,
                    reasons::APPLY_PENDING
                )
            })
            .collect(),
    )
}

fn join_messages(mut messages: Vec<String>) -> String {
    if messages.len() == 1 {
        return messages.remove(0);
    }
    format!("[{}]", messages.join(", "))
}
