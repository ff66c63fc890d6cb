//! # Initialization
//!
//! Controller startup: rustls setup, tracing, metrics, server startup,
//! Kubernetes client setup and ClusterOperator bootstrap.

use crate::config::{self, ServerConfig};
use crate::constants::{AGGREGATED_CLUSTER_OPERATOR_NAME, CORE_CLUSTER_OPERATOR_NAME};
use crate::controller::reconciler::Reconciler;
use crate::controller::server::{start_server, ServerState};
use crate::observability;
use crate::status::StatusWriter;
use crate::store::{KubeStatusStore, StatusStore, StoreError};
use anyhow::{Context, Result};
use kube::{Client, ResourceExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Everything the watch loops need
pub struct InitializationResult {
    /// Kubernetes client
    pub client: Client,
    /// Shared reconciler context
    pub reconciler: Arc<Reconciler>,
    /// Server state for health checks
    pub server_state: Arc<ServerState>,
}

impl std::fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializationResult")
            .field("reconciler", &self.reconciler)
            .field("server_state", &self.server_state)
            .finish_non_exhaustive()
    }
}

/// Initialize the controller runtime
///
/// This function handles:
/// - rustls crypto provider setup
/// - Tracing subscriber setup
/// - Metrics registration
/// - HTTP server startup
/// - Kubernetes client creation
/// - Creating both ClusterOperators if they are missing
pub async fn initialize() -> Result<InitializationResult> {
    // Must happen before any TLS connection is made.
    let provider_installed = rustls::crypto::ring::default_provider()
        .install_default()
        .is_ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "platform_operators_controller=info".into()),
        )
        .init();

    if !provider_installed {
        debug!("rustls crypto provider was already installed");
    }

    info!("Starting platform operators status controller");

    let (controller_config, server_config) = config::load_config();
    info!(
        "Configuration: release={}, namespace={}, threshold={:?}, probe={}, concurrency={}",
        controller_config.release_version,
        controller_config.system_namespace,
        controller_config.availability_threshold,
        controller_config.probe_mode,
        controller_config.worker_concurrency
    );

    observability::metrics::register_metrics()?;

    let server_state = Arc::new(ServerState {
        is_ready: Arc::new(AtomicBool::new(false)),
    });

    let server_state_clone = Arc::clone(&server_state);
    let server_port = server_config.metrics_port;
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(server_port, server_state_clone).await {
            error!("HTTP server error: {}", e);
        }
    });

    wait_for_server_ready(&server_state, &server_handle, &server_config).await?;

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;

    ensure_cluster_operators(&KubeStatusStore::new(client.clone()))
        .await
        .context("Failed to bootstrap ClusterOperators")?;

    let reconciler = Arc::new(Reconciler::new(
        client.clone(),
        controller_config,
        CancellationToken::new(),
    ));

    info!("Controller initialized, starting watch loops...");

    Ok(InitializationResult {
        client,
        reconciler,
        server_state,
    })
}

/// Create the core and aggregated ClusterOperators when missing
pub async fn ensure_cluster_operators(store: &dyn StatusStore) -> Result<(), StoreError> {
    let writer = StatusWriter::new(store);
    for name in [CORE_CLUSTER_OPERATOR_NAME, AGGREGATED_CLUSTER_OPERATOR_NAME] {
        let operator = writer.ensure_exists(name).await?;
        debug!("ClusterOperator {} present", operator.name_any());
    }
    Ok(())
}

/// Wait for the HTTP server to become ready
async fn wait_for_server_ready(
    server_state: &Arc<ServerState>,
    server_handle: &tokio::task::JoinHandle<()>,
    server_config: &ServerConfig,
) -> Result<()> {
    let startup_timeout = std::time::Duration::from_secs(server_config.startup_timeout_secs);
    let poll_interval = std::time::Duration::from_millis(server_config.poll_interval_ms);
    let start_time = std::time::Instant::now();

    loop {
        if server_handle.is_finished() {
            return Err(anyhow::anyhow!("HTTP server failed to start"));
        }

        if server_state.is_ready.load(Ordering::Relaxed) {
            info!("HTTP server is ready and accepting connections");
            return Ok(());
        }

        if start_time.elapsed() > startup_timeout {
            return Err(anyhow::anyhow!(
                "HTTP server failed to become ready within {} seconds",
                startup_timeout.as_secs()
            ));
        }

        tokio::time::sleep(poll_interval).await;
    }
}
