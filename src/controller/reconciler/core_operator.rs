//! # Core ClusterOperator
//!
//! Reports the availability of the platform operators manager itself. The
//! raw probe result is smoothed by the [`AvailabilityWatchdog`] so transient
//! failures only raise Degraded.

use super::types::{commit_status, PassOutcome, ReconcilerError};
use crate::config::ControllerConfig;
use crate::crd::ConditionStatus;
use crate::observability;
use crate::probe::HealthProbe;
use crate::status::defaults::{set_default_related_objects, set_default_status_conditions};
use crate::status::{condition_types, is_status_condition, StatusBuilder, StatusWriter};
use crate::store::{Clock, StatusStore, StoreError};
use crate::watchdog::AvailabilityWatchdog;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub struct CoreReconciler {
    store: Arc<dyn StatusStore>,
    probe: Arc<dyn HealthProbe>,
    clock: Arc<dyn Clock>,
    watchdog: AvailabilityWatchdog,
    release_version: String,
    system_namespace: String,
}

impl std::fmt::Debug for CoreReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreReconciler")
            .field("watchdog", &self.watchdog)
            .field("system_namespace", &self.system_namespace)
            .finish_non_exhaustive()
    }
}

impl CoreReconciler {
    pub fn new(
        config: &ControllerConfig,
        store: Arc<dyn StatusStore>,
        probe: Arc<dyn HealthProbe>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            probe,
            clock,
            watchdog: AvailabilityWatchdog::new(
                config.availability_threshold_delta(),
                config.release_version.clone(),
            ),
            release_version: config.release_version.clone(),
            system_namespace: config.system_namespace.clone(),
        }
    }

    /// One pass over the named core ClusterOperator
    ///
    /// A missing ClusterOperator is recreated empty and the pass ends there;
    /// the next pass fills in its status.
    pub async fn reconcile(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> Result<PassOutcome, ReconcilerError> {
        let Some(existing) = self.store.get(name).await? else {
            info!("Core ClusterOperator {} does not exist, recreating it", name);
            return match self.store.create(name).await {
                Ok(_) => Ok(PassOutcome::Recreated),
                Err(StoreError::Conflict { .. }) => Ok(PassOutcome::Recreated),
                Err(e) => Err(e.into()),
            };
        };

        let now = self.clock.now();
        let previous = existing.status.clone().unwrap_or_default();
        let builder = set_default_status_conditions(
            StatusBuilder::from_status(&previous),
            &self.release_version,
            now,
        );
        let builder = set_default_related_objects(builder, &self.system_namespace, true);

        debug!("Checking whether the platform operator manager is available");
        let healthy = self.probe.check_availability(&existing).await;
        let decision = self.watchdog.evaluate(builder, &previous, healthy, now);
        if healthy
            && is_status_condition(
                &previous.conditions,
                condition_types::DEGRADED,
                ConditionStatus::True,
            )
        {
            info!(
                "Platform operator manager passed its availability check again (threshold {})",
                self.watchdog.threshold()
            );
        }
        info!(
            "Availability of {}: probe healthy={}, watchdog state={}",
            name, healthy, decision.state
        );
        observability::metrics::set_watchdog_state(name, decision.state.gauge_value());

        let writer = StatusWriter::new(self.store.as_ref());
        commit_status(&writer, &existing, decision.status, cancel).await?;

        if decision.state.is_settled() {
            Ok(PassOutcome::Settled)
        } else {
            Ok(PassOutcome::NeedsRecheck {
                reason: decision.state.as_str(),
            })
        }
    }
}
