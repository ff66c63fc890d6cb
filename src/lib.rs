//! Platform Operators Controller Library
//!
//! Aggregates platform operator health into OpenShift ClusterOperator status
//! documents, with availability hysteresis for the core operator.

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod inspect;
pub mod observability;
pub mod probe;
pub mod runtime;
pub mod status;
pub mod store;
pub mod watchdog;

// Re-export CRD types for convenience
pub use crd::*;
