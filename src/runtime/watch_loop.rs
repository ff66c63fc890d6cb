//! # Watch Loop
//!
//! Runs the core and aggregated ClusterOperator controllers until shutdown.
//!
//! Each controller watches a single ClusterOperator by name. The aggregated
//! controller also watches PlatformOperators and maps every change onto the
//! aggregated ClusterOperator.

use crate::constants::{AGGREGATED_CLUSTER_OPERATOR_NAME, CORE_CLUSTER_OPERATOR_NAME};
use crate::controller::reconciler::{reconcile_aggregated, reconcile_core, Reconciler, ReconcilerError};
use crate::crd::{ClusterOperator, PlatformOperator};
use crate::runtime::error_policy::handle_reconciliation_error;
use anyhow::Result;
use futures::StreamExt;
use kube::runtime::controller::{self, Action, Controller};
use kube::runtime::reflector::ObjectRef;
use kube::runtime::watcher;
use kube::{Api, Client};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type ControllerResult =
    std::result::Result<(ObjectRef<ClusterOperator>, Action), controller::Error<ReconcilerError, watcher::Error>>;

/// Watcher configuration selecting one ClusterOperator by name
fn named(name: &str) -> watcher::Config {
    watcher::Config::default().fields(&format!("metadata.name={name}"))
}

/// Map any PlatformOperator change onto the aggregated ClusterOperator
pub fn requeue_aggregated(_operator: PlatformOperator) -> Option<ObjectRef<ClusterOperator>> {
    Some(ObjectRef::new(AGGREGATED_CLUSTER_OPERATOR_NAME))
}

/// Run both controllers until the reconciler's cancellation token fires
pub async fn run_controllers(client: Client, ctx: Arc<Reconciler>) -> Result<()> {
    let cluster_operators: Api<ClusterOperator> = Api::all(client.clone());
    let platform_operators: Api<PlatformOperator> = Api::all(client);
    let controller_config = controller::Config::default().concurrency(ctx.config.worker_concurrency);

    let core = Controller::new(cluster_operators.clone(), named(CORE_CLUSTER_OPERATOR_NAME))
        .with_config(controller_config.clone())
        .graceful_shutdown_on(ctx.cancel.clone().cancelled_owned())
        .run(reconcile_core, handle_reconciliation_error, Arc::clone(&ctx))
        .for_each(|result| async move { log_result("core", result) });

    let aggregated = Controller::new(cluster_operators, named(AGGREGATED_CLUSTER_OPERATOR_NAME))
        .watches(platform_operators, watcher::Config::default(), requeue_aggregated)
        .with_config(controller_config)
        .graceful_shutdown_on(ctx.cancel.clone().cancelled_owned())
        .run(reconcile_aggregated, handle_reconciliation_error, Arc::clone(&ctx))
        .for_each(|result| async move { log_result("aggregated", result) });

    info!("Watching ClusterOperators {} and {}", CORE_CLUSTER_OPERATOR_NAME, AGGREGATED_CLUSTER_OPERATOR_NAME);
    tokio::join!(core, aggregated);
    info!("Controllers stopped");
    Ok(())
}

fn log_result(controller: &str, result: ControllerResult) {
    match result {
        Ok((object, action)) => debug!("{} reconciled {}: {:?}", controller, object.name, action),
        Err(controller::Error::ReconcilerFailed(e, object)) => {
            debug!("{} failed to reconcile {}: {}", controller, object.name, e);
        }
        Err(e) => warn!("{} controller stream error: {}", controller, e),
    }
}

/// Cancel `token` on SIGINT or SIGTERM
pub fn cancel_on_shutdown_signal(token: CancellationToken) {
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, stopping controllers");
        token.cancel();
    });
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(e) => {
            warn!("Failed to install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
