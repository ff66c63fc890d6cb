//! # Platform Operators Controller
//!
//! Reports the health of the platform operators manager and of every
//! PlatformOperator through two OpenShift ClusterOperators:
//!
//! - **platform-operators-core** - availability of the manager, smoothed so
//!   transient probe failures only raise `Degraded`
//! - **platform-operators-aggregated** - aggregate health of all
//!   PlatformOperators, re-evaluated whenever one of them changes
//!
//! Status documents are only written when their content changes.

use anyhow::Result;
use platform_operators_controller::runtime::initialization::initialize;
use platform_operators_controller::runtime::watch_loop::{cancel_on_shutdown_signal, run_controllers};

#[tokio::main]
async fn main() -> Result<()> {
    let init_result = initialize().await?;

    cancel_on_shutdown_signal(init_result.reconciler.cancel.clone());

    run_controllers(init_result.client, init_result.reconciler).await
}
