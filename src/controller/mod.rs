//! # Controller
//!
//! Reconcilers, error backoff and the metrics/health HTTP server.

pub mod backoff;
pub mod reconciler;
pub mod server;
