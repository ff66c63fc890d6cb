//! # Error Policy
//!
//! Error handling and backoff for the controller watch loops.

use crate::constants;
use crate::controller::backoff::FibonacciBackoff;
use crate::controller::reconciler::{controller_label, BackoffState, Reconciler, ReconcilerError};
use crate::crd::ClusterOperator;
use crate::observability;
use kube::ResourceExt;
use kube_runtime::controller::Action;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Decide the retry for a failed pass
///
/// - cancelled passes are not retried
/// - conflicts re-read after the short requeue
/// - anything else backs off per ClusterOperator on a Fibonacci sequence
pub fn handle_reconciliation_error(
    obj: Arc<ClusterOperator>,
    error: &ReconcilerError,
    ctx: Arc<Reconciler>,
) -> Action {
    let name = obj.name_any();

    if matches!(error, ReconcilerError::Cancelled) {
        info!("Reconciliation of {} cancelled, not retrying", name);
        return Action::await_change();
    }

    let error_span = tracing::span!(
        tracing::Level::ERROR,
        "controller.watch.reconciliation_error",
        resource.name = %name,
        error = %error
    );
    let _error_guard = error_span.enter();

    observability::metrics::increment_reconciliation_errors(controller_label(&name));

    if error.is_conflict() {
        warn!("ClusterOperator {} was modified concurrently, re-reading: {}", name, error);
        observability::metrics::increment_requeues_total("conflict");
        return Action::requeue(ctx.config.short_requeue);
    }

    error!("Reconciliation error for {}: {:?}", name, error);

    let (backoff_seconds, error_count) = match ctx.backoff_states.lock() {
        Ok(mut states) => {
            let state = states.entry(name.clone()).or_insert_with(|| {
                BackoffState::new(FibonacciBackoff::new(
                    constants::ERROR_BACKOFF_MIN_SECS,
                    constants::ERROR_BACKOFF_MAX_SECS,
                ))
            });
            state.increment_error();
            (state.backoff.next_backoff_seconds(), state.error_count)
        }
        Err(e) => {
            warn!("Failed to lock backoff_states: {}, using default backoff", e);
            (constants::DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS, 0)
        }
    };

    info!(
        "🔄 Retrying {} with Fibonacci backoff: {}s (error count: {})",
        name, backoff_seconds, error_count
    );

    observability::metrics::increment_requeues_total("error-backoff");
    Action::requeue(Duration::from_secs(backoff_seconds))
}
