//! # Store Interfaces
//!
//! Seams between the status core and the object store it runs against.
//!
//! - `StatusStore` - read, create and conditionally write ClusterOperators
//! - `ChildLister` - list the child resources whose health is aggregated
//! - `Clock` - injectable wall clock
//!
//! The Kubernetes-backed implementations live in [`kubernetes`].

pub mod kubernetes;

use crate::crd::ClusterOperator;
use crate::inspect::ChildSnapshot;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use kubernetes::{KubeChildLister, KubeStatusStore};

/// Errors reported by the object store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The object does not exist
    #[error("{kind} {name} not found")]
    NotFound { kind: &'static str, name: String },
    /// The object was modified since it was read; re-read and rebuild
    #[error("precondition failed: {kind} {name} was modified concurrently")]
    Conflict { kind: &'static str, name: String },
    /// The store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// Kubernetes API failure
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),
    /// The status document could not be encoded
    #[error("failed to encode object: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether this error means a concurrent modification
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Read and write access to ClusterOperator documents
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Fetch a ClusterOperator, `None` if it does not exist
    async fn get(&self, name: &str) -> Result<Option<ClusterOperator>, StoreError>;

    /// Create an empty ClusterOperator
    async fn create(&self, name: &str) -> Result<ClusterOperator, StoreError>;

    /// Replace the status of an observed ClusterOperator
    ///
    /// Must fail with [`StoreError::Conflict`] when the object changed since
    /// it was observed.
    async fn write_status(&self, operator: &ClusterOperator) -> Result<(), StoreError>;
}

/// Listing of the child resources feeding the aggregate verdict
#[async_trait]
pub trait ChildLister: Send + Sync {
    async fn list_children(&self) -> Result<Vec<ChildSnapshot>, StoreError>;
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
