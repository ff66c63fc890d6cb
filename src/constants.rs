//! # Constants
//!
//! Resource names and configuration defaults.

/// ClusterOperator reporting the health of the platform operators manager itself
pub const CORE_CLUSTER_OPERATOR_NAME: &str = "platform-operators-core";

/// ClusterOperator reporting the aggregate health of all PlatformOperators
pub const AGGREGATED_CLUSTER_OPERATOR_NAME: &str = "platform-operators-aggregated";

/// Version reported when RELEASE_VERSION is not set
pub const DEFAULT_RELEASE_VERSION: &str = "0.0.1-snapshot";

/// Namespace the platform operators manager runs in
pub const DEFAULT_SYSTEM_NAMESPACE: &str = "openshift-platform-operators";

/// How long the availability probe may fail before Available=False is reported
pub const DEFAULT_AVAILABILITY_THRESHOLD: &str = "5m";

/// Re-check delay for passes that have not settled
pub const DEFAULT_SHORT_REQUEUE_SECS: u64 = 5;

/// Re-check delay for settled passes
pub const DEFAULT_RESYNC_INTERVAL: &str = "10m";

/// Maximum number of passes running at once
pub const DEFAULT_WORKER_CONCURRENCY: u16 = 4;

/// Availability probe used by the core ClusterOperator
pub const DEFAULT_PROBE_MODE: &str = "list";

/// Default port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Seconds to wait for the HTTP server to bind
pub const DEFAULT_SERVER_STARTUP_TIMEOUT_SECS: u64 = 10;

/// Milliseconds between readiness polls during startup
pub const DEFAULT_SERVER_POLL_INTERVAL_MS: u64 = 50;

/// Requeue delay used when backoff state is unavailable
pub const DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS: u64 = 30;

/// Upper bound for configured durations (365 days)
pub const MAX_CONFIGURED_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// Error backoff bounds (seconds)
pub const ERROR_BACKOFF_MIN_SECS: u64 = 5;
pub const ERROR_BACKOFF_MAX_SECS: u64 = 300;
