//! # Observability
//!
//! Prometheus metrics for the status controllers.

pub mod metrics;
