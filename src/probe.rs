//! # Health Probes
//!
//! Raw availability checks fed into the availability watchdog.
//!
//! - `ListProbe` - healthy when the child resources can be listed
//! - `FleetProbe` - healthy when every child reports success
//! - `StaticProbe` - fixed answer, for tests and disabled checks

use crate::crd::ClusterOperator;
use crate::inspect::{inspect_children, FleetVerdict, SuccessCriteria};
use crate::store::ChildLister;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Availability check for a ClusterOperator
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Whether the component behind `operator` is available right now
    async fn check_availability(&self, operator: &ClusterOperator) -> bool;
}

/// Healthy when the child listing succeeds
pub struct ListProbe {
    lister: Arc<dyn ChildLister>,
}

impl ListProbe {
    pub fn new(lister: Arc<dyn ChildLister>) -> Self {
        Self { lister }
    }
}

impl std::fmt::Debug for ListProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListProbe").finish_non_exhaustive()
    }
}

#[async_trait]
impl HealthProbe for ListProbe {
    async fn check_availability(&self, _operator: &ClusterOperator) -> bool {
        match self.lister.list_children().await {
            Ok(_) => true,
            Err(e) => {
                warn!("Availability check failed: unable to list children: {}", e);
                false
            }
        }
    }
}

/// Healthy when every child meets the success criteria
///
/// Zero children are trivially healthy. A failed listing is unhealthy.
pub struct FleetProbe {
    lister: Arc<dyn ChildLister>,
    criteria: SuccessCriteria,
}

impl FleetProbe {
    pub fn new(lister: Arc<dyn ChildLister>, criteria: SuccessCriteria) -> Self {
        Self { lister, criteria }
    }
}

impl std::fmt::Debug for FleetProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FleetProbe")
            .field("criteria", &self.criteria)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl HealthProbe for FleetProbe {
    async fn check_availability(&self, _operator: &ClusterOperator) -> bool {
        let children = match self.lister.list_children().await {
            Ok(children) => children,
            Err(e) => {
                warn!("Availability check failed: unable to list children: {}", e);
                return false;
            }
        };

        let verdict = inspect_children(&children, &self.criteria).verdict();
        debug!("Fleet verdict over {} children: {:?}", children.len(), verdict);
        verdict == FleetVerdict::AllHealthy
    }
}

/// Always returns the configured answer
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe {
    available: bool,
}

impl StaticProbe {
    pub fn new(available: bool) -> Self {
        Self { available }
    }
}

#[async_trait]
impl HealthProbe for StaticProbe {
    async fn check_availability(&self, _operator: &ClusterOperator) -> bool {
        self.available
    }
}
