//! # Controller Settings
//!
//! Reconciliation settings: release version, namespace, watchdog threshold,
//! requeue intervals, worker concurrency and probe selection.

use super::duration::parse_kubernetes_duration;
use super::var_or_default;
use crate::constants::*;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Availability probe used for the core ClusterOperator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeMode {
    /// Healthy when PlatformOperators can be listed
    #[default]
    List,
    /// Healthy when every PlatformOperator is applied
    Fleet,
    /// Always healthy
    Noop,
}

impl FromStr for ProbeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "list" => Ok(ProbeMode::List),
            "fleet" => Ok(ProbeMode::Fleet),
            "noop" => Ok(ProbeMode::Noop),
            other => Err(format!(
                "unknown probe mode '{other}', expected 'list', 'fleet' or 'noop'"
            )),
        }
    }
}

impl fmt::Display for ProbeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeMode::List => f.write_str("list"),
            ProbeMode::Fleet => f.write_str("fleet"),
            ProbeMode::Noop => f.write_str("noop"),
        }
    }
}

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Version reported under the `operator` operand
    pub release_version: String,
    /// Namespace listed as a related object
    pub system_namespace: String,
    /// How long the availability probe may fail before Available=False
    pub availability_threshold: Duration,
    /// Re-check delay for unsettled passes
    pub short_requeue: Duration,
    /// Re-check delay for settled passes
    pub resync_interval: Duration,
    /// Maximum parallel passes per controller
    pub worker_concurrency: u16,
    pub probe_mode: ProbeMode,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ControllerConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let probe_mode = match lookup("PROBE_MODE") {
            None => ProbeMode::default(),
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("{}, using '{}'", e, DEFAULT_PROBE_MODE);
                ProbeMode::default()
            }),
        };

        Self {
            release_version: lookup("RELEASE_VERSION")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_RELEASE_VERSION.to_string()),
            system_namespace: lookup("SYSTEM_NAMESPACE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SYSTEM_NAMESPACE.to_string()),
            availability_threshold: duration_or_default(
                &lookup,
                "AVAILABILITY_THRESHOLD",
                DEFAULT_AVAILABILITY_THRESHOLD,
            ),
            short_requeue: Duration::from_secs(
                var_or_default(&lookup, "SHORT_REQUEUE_SECS", DEFAULT_SHORT_REQUEUE_SECS).max(1),
            ),
            resync_interval: duration_or_default(&lookup, "RESYNC_INTERVAL", DEFAULT_RESYNC_INTERVAL),
            worker_concurrency: var_or_default(
                &lookup,
                "WORKER_CONCURRENCY",
                DEFAULT_WORKER_CONCURRENCY,
            )
            .max(1),
            probe_mode,
        }
    }

    /// Watchdog threshold as a chrono duration
    pub fn availability_threshold_delta(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.availability_threshold)
            .unwrap_or_else(|_| chrono::Duration::minutes(5))
    }
}

fn duration_or_default<F>(lookup: &F, key: &str, default: &str) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    let fallback = || parse_kubernetes_duration(default).unwrap_or(Duration::from_secs(300));
    let parsed = match lookup(key) {
        None => return fallback(),
        Some(raw) => parse_kubernetes_duration(&raw).unwrap_or_else(|e| {
            warn!("Invalid {}: {}, using default '{}'", key, e, default);
            fallback()
        }),
    };

    let max = Duration::from_secs(MAX_CONFIGURED_DURATION_SECS);
    if parsed > max {
        warn!("{} of {:?} is too large, capping at {:?}", key, parsed, max);
        return max;
    }
    parsed
}
