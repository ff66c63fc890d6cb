//! # Reconciler
//!
//! Status reconciliation for the core and aggregated ClusterOperators.
//!
//! Every pass follows the same flow: read the current ClusterOperator, seed a
//! builder from its status, apply defaults, decide the availability
//! conditions, then write once if the document changed.
//!
//! ## Sub-modules
//!
//! - `types` - Errors, pass outcomes, backoff state and shared context
//! - `core_operator` - Manager availability behind the watchdog
//! - `aggregated_operator` - PlatformOperator fleet health

pub mod aggregated_operator;
pub mod core_operator;
pub mod types;

pub use aggregated_operator::AggregatedReconciler;
pub use core_operator::CoreReconciler;
pub use types::{BackoffState, PassOutcome, Reconciler, ReconcilerError};

use crate::config::ControllerConfig;
use crate::constants::CORE_CLUSTER_OPERATOR_NAME;
use crate::crd::ClusterOperator;
use crate::observability;
use kube::ResourceExt;
use kube_runtime::controller::Action;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, Instrument, Level};

/// Metrics label for the controller owning a ClusterOperator
pub fn controller_label(name: &str) -> &'static str {
    if name == CORE_CLUSTER_OPERATOR_NAME {
        "core"
    } else {
        "aggregated"
    }
}

/// Map a pass outcome onto the runtime's next action
pub fn requeue_action(config: &ControllerConfig, outcome: PassOutcome) -> Action {
    match outcome {
        PassOutcome::Settled => {
            observability::metrics::increment_requeues_total("resync");
            Action::requeue(config.resync_interval)
        }
        PassOutcome::NeedsRecheck { reason } => {
            debug!("Pass not settled ({}), re-checking in {:?}", reason, config.short_requeue);
            observability::metrics::increment_requeues_total(reason);
            Action::requeue(config.short_requeue)
        }
        PassOutcome::Recreated => {
            observability::metrics::increment_requeues_total("recreated");
            Action::requeue(config.short_requeue)
        }
        PassOutcome::Missing => Action::await_change(),
    }
}

/// Reconcile the core ClusterOperator
pub async fn reconcile_core(
    obj: Arc<ClusterOperator>,
    ctx: Arc<Reconciler>,
) -> Result<Action, ReconcilerError> {
    let name = obj.name_any();
    let span = tracing::span!(
        Level::INFO,
        "controller.reconcile",
        controller = "core",
        resource.name = %name
    );

    async {
        let start = Instant::now();
        observability::metrics::increment_reconciliations("core");
        let result = ctx.core.reconcile(&name, &ctx.cancel).await;
        observability::metrics::observe_reconciliation_duration(start.elapsed().as_secs_f64());

        let outcome = result?;
        ctx.reset_backoff(&name);
        Ok::<_, ReconcilerError>(requeue_action(&ctx.config, outcome))
    }
    .instrument(span)
    .await
}

/// Reconcile the aggregated ClusterOperator
pub async fn reconcile_aggregated(
    obj: Arc<ClusterOperator>,
    ctx: Arc<Reconciler>,
) -> Result<Action, ReconcilerError> {
    let name = obj.name_any();
    let span = tracing::span!(
        Level::INFO,
        "controller.reconcile",
        controller = "aggregated",
        resource.name = %name
    );

    async {
        let start = Instant::now();
        observability::metrics::increment_reconciliations("aggregated");
        let result = ctx.aggregated.reconcile(&name, &ctx.cancel).await;
        observability::metrics::observe_reconciliation_duration(start.elapsed().as_secs_f64());

        let outcome = result?;
        ctx.reset_backoff(&name);
        Ok::<_, ReconcilerError>(requeue_action(&ctx.config, outcome))
    }
    .instrument(span)
    .await
}
