//! # Reconciler Types
//!
//! Errors, pass outcomes, backoff state and the shared controller context.

use crate::config::{ControllerConfig, ProbeMode};
use crate::controller::backoff::FibonacciBackoff;
use crate::controller::reconciler::aggregated_operator::AggregatedReconciler;
use crate::controller::reconciler::core_operator::CoreReconciler;
use crate::inspect::SuccessCriteria;
use crate::probe::{FleetProbe, HealthProbe, ListProbe, StaticProbe};
use crate::status::{StatusWriter, WriteOutcome};
use crate::store::{ChildLister, Clock, KubeChildLister, KubeStatusStore, StatusStore, StoreError, SystemClock};
use crate::crd::{ClusterOperator, ClusterOperatorStatus};
use crate::observability;
use kube::Client;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("reconciliation cancelled before the status write")]
    Cancelled,
}

impl ReconcilerError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ReconcilerError::Store(e) if e.is_conflict())
    }
}

/// What a successful pass asks of the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// Stable state reached; re-check on the resync interval
    Settled,
    /// Not yet stable; re-check soon
    NeedsRecheck { reason: &'static str },
    /// The ClusterOperator was missing and has been created
    Recreated,
    /// The ClusterOperator does not exist; wait for it to appear
    Missing,
}

/// Per-resource error backoff
#[derive(Debug, Clone)]
pub struct BackoffState {
    pub backoff: FibonacciBackoff,
    pub error_count: u32,
}

impl BackoffState {
    pub fn new(backoff: FibonacciBackoff) -> Self {
        Self {
            backoff,
            error_count: 0,
        }
    }

    pub fn increment_error(&mut self) {
        self.error_count = self.error_count.saturating_add(1);
    }

    /// Start over from the minimum delay
    pub fn reset(&mut self) {
        self.backoff.reset();
        self.error_count = 0;
    }
}

/// Write `status` unless the pass was cancelled
pub(crate) async fn commit_status(
    writer: &StatusWriter<'_>,
    existing: &ClusterOperator,
    status: ClusterOperatorStatus,
    cancel: &CancellationToken,
) -> Result<WriteOutcome, ReconcilerError> {
    if cancel.is_cancelled() {
        debug!("Pass cancelled, dropping status update");
        return Err(ReconcilerError::Cancelled);
    }

    let outcome = writer.update_status(existing, status).await?;
    observability::metrics::increment_status_writes(match outcome {
        WriteOutcome::Written => "written",
        WriteOutcome::Unchanged => "unchanged",
    });
    Ok(outcome)
}

/// Shared context for both ClusterOperator controllers
pub struct Reconciler {
    pub config: ControllerConfig,
    pub core: CoreReconciler,
    pub aggregated: AggregatedReconciler,
    /// Error backoff per ClusterOperator name
    pub backoff_states: Mutex<HashMap<String, BackoffState>>,
    /// Cancelled on shutdown
    pub cancel: CancellationToken,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Context backed by the Kubernetes API
    pub fn new(client: Client, config: ControllerConfig, cancel: CancellationToken) -> Self {
        let store: Arc<dyn StatusStore> = Arc::new(KubeStatusStore::new(client.clone()));
        let lister: Arc<dyn ChildLister> = Arc::new(KubeChildLister::new(client));
        Self::from_parts(config, store, lister, Arc::new(SystemClock), cancel)
    }

    /// Context over arbitrary store, lister and clock implementations
    pub fn from_parts(
        config: ControllerConfig,
        store: Arc<dyn StatusStore>,
        lister: Arc<dyn ChildLister>,
        clock: Arc<dyn Clock>,
        cancel: CancellationToken,
    ) -> Self {
        let probe: Arc<dyn HealthProbe> = match config.probe_mode {
            ProbeMode::List => Arc::new(ListProbe::new(Arc::clone(&lister))),
            ProbeMode::Fleet => Arc::new(FleetProbe::new(
                Arc::clone(&lister),
                SuccessCriteria::platform_operator_applied(),
            )),
            ProbeMode::Noop => Arc::new(StaticProbe::new(true)),
        };

        Self {
            core: CoreReconciler::new(&config, Arc::clone(&store), probe, Arc::clone(&clock)),
            aggregated: AggregatedReconciler::new(&config, store, lister, clock),
            config,
            backoff_states: Mutex::new(HashMap::new()),
            cancel,
        }
    }

    /// Forget the error history of a resource after a successful pass
    pub fn reset_backoff(&self, name: &str) {
        if let Ok(mut states) = self.backoff_states.lock() {
            if let Some(state) = states.get_mut(name) {
                state.reset();
            }
        }
    }
}
