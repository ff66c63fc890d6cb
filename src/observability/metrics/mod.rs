//! # Metrics Module
//!
//! Prometheus metrics for monitoring the controllers.
//!
//! ## Sub-modules
//!
//! - `registry` - Metrics registry setup, registration and text export
//! - `controller_metrics` - Reconciliations, status writes, requeues and watchdog state

pub mod controller_metrics;
pub mod registry;

pub use controller_metrics::*;
pub use registry::*;
