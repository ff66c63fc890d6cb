//! # Availability Watchdog
//!
//! Hysteresis between a raw availability probe and the Available / Degraded /
//! Progressing conditions of a ClusterOperator.
//!
//! The first failed probe only raises `Degraded=True`; `Available` keeps its
//! previous value. Only when probes keep failing until
//! `Degraded.lastTransitionTime + threshold` is `Available=False` reported. A
//! single healthy probe clears everything. The Degraded condition of the
//! previously persisted document is the only memory the watchdog has, so
//! repeated failures never restart the clock.

use crate::crd::{ClusterOperatorStatus, ConditionStatus};
use crate::status::builder::StatusBuilder;
use crate::status::condition::{condition_types, find_status_condition, reasons};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::fmt;
use tracing::debug;

const DEGRADED_MESSAGE: &str = "The platform operator manager has failed an availability check";
const THRESHOLD_EXCEEDED_MESSAGE: &str = "Exceeded platform operator availability timeout";

/// Where the watchdog stands after a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogState {
    /// The probe passed
    Available,
    /// The probe is failing but the grace period has not run out
    RecentlyDegraded {
        degraded_since: DateTime<Utc>,
        deadline: DateTime<Utc>,
    },
    /// The probe has been failing for at least the threshold
    PersistentlyUnavailable { degraded_since: DateTime<Utc> },
}

impl WatchdogState {
    /// Whether the pass reached a stable state; anything else wants a re-check soon
    pub fn is_settled(&self) -> bool {
        matches!(self, WatchdogState::Available)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WatchdogState::Available => "available",
            WatchdogState::RecentlyDegraded { .. } => "recently_degraded",
            WatchdogState::PersistentlyUnavailable { .. } => "persistently_unavailable",
        }
    }

    /// Gauge encoding: 0 available, 1 recently degraded, 2 unavailable
    pub fn gauge_value(&self) -> i64 {
        match self {
            WatchdogState::Available => 0,
            WatchdogState::RecentlyDegraded { .. } => 1,
            WatchdogState::PersistentlyUnavailable { .. } => 2,
        }
    }
}

impl fmt::Display for WatchdogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one watchdog evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchdogDecision {
    pub state: WatchdogState,
    pub status: ClusterOperatorStatus,
}

/// Availability hysteresis state machine
#[derive(Debug, Clone)]
pub struct AvailabilityWatchdog {
    threshold: Duration,
    release_version: String,
}

impl AvailabilityWatchdog {
    pub fn new(threshold: Duration, release_version: impl Into<String>) -> Self {
        Self {
            threshold,
            release_version: release_version.into(),
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// When a degradation that started at `degraded_since` turns into
    /// unavailability; saturates at the latest representable time, which is
    /// never reached
    pub fn deadline(&self, degraded_since: DateTime<Utc>) -> DateTime<Utc> {
        degraded_since
            .checked_add_signed(self.threshold)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Decide the availability conditions for this pass
    ///
    /// `previous` is the document persisted by the preceding pass; `builder`
    /// carries the document under construction (normally seeded from
    /// `previous` with defaults applied).
    pub fn evaluate(
        &self,
        builder: StatusBuilder,
        previous: &ClusterOperatorStatus,
        probe_healthy: bool,
        now: DateTime<Utc>,
    ) -> WatchdogDecision {
        if probe_healthy {
            return WatchdogDecision {
                state: WatchdogState::Available,
                status: self.mark_available(builder, now).build(),
            };
        }

        let degraded = find_status_condition(&previous.conditions, condition_types::DEGRADED)
            .filter(|c| c.status == ConditionStatus::True);

        let Some(degraded) = degraded else {
            return self.first_violation(builder, previous, now);
        };

        let degraded_since = degraded.last_transition_time;
        let deadline = self.deadline(degraded_since);
        debug!(
            threshold = %self.threshold,
            current = %now,
            last = %degraded_since,
            adjusted = %deadline,
            "checking whether time spent in degraded state has exceeded the configured threshold"
        );

        if now < deadline {
            return WatchdogDecision {
                state: WatchdogState::RecentlyDegraded {
                    degraded_since,
                    deadline,
                },
                status: builder.build(),
            };
        }

        debug!("adjusted timestamp has exceeded unavailability threshold: setting Available=False and Progressing=False");
        let status = builder
            .set_condition(
                condition_types::AVAILABLE,
                ConditionStatus::False,
                reasons::EXCEEDED_UNAVAILABILITY_THRESHOLD,
                THRESHOLD_EXCEEDED_MESSAGE,
                now,
            )
            .set_condition(
                condition_types::PROGRESSING,
                ConditionStatus::False,
                reasons::EXCEEDED_UNAVAILABILITY_THRESHOLD,
                THRESHOLD_EXCEEDED_MESSAGE,
                now,
            )
            .set_condition(
                condition_types::DEGRADED,
                ConditionStatus::True,
                reasons::AVAILABILITY_CHECK_FAILED,
                DEGRADED_MESSAGE,
                now,
            )
            .build();

        WatchdogDecision {
            state: WatchdogState::PersistentlyUnavailable { degraded_since },
            status,
        }
    }

    fn mark_available(&self, builder: StatusBuilder, now: DateTime<Utc>) -> StatusBuilder {
        builder
            .set_condition(
                condition_types::AVAILABLE,
                ConditionStatus::True,
                reasons::AS_EXPECTED,
                &format!(
                    "The platform operator manager is available at {}",
                    self.release_version
                ),
                now,
            )
            .set_condition(condition_types::PROGRESSING, ConditionStatus::False, "", "", now)
            .set_condition(condition_types::DEGRADED, ConditionStatus::False, "", "", now)
    }

    fn first_violation(
        &self,
        mut builder: StatusBuilder,
        previous: &ClusterOperatorStatus,
        now: DateTime<Utc>,
    ) -> WatchdogDecision {
        debug!("setting Degraded=True since this is the first violation");

        // Available=True survives the first violation untouched.
        if let Some(available) = find_status_condition(&previous.conditions, condition_types::AVAILABLE)
            .filter(|c| c.status == ConditionStatus::True)
        {
            builder = builder.set_condition(
                condition_types::AVAILABLE,
                ConditionStatus::True,
                &available.reason,
                &available.message,
                available.last_transition_time,
            );
        }

        let builder = builder.set_condition(
            condition_types::DEGRADED,
            ConditionStatus::True,
            reasons::AVAILABILITY_CHECK_FAILED,
            DEGRADED_MESSAGE,
            now,
        );
        let degraded_since = builder
            .condition(condition_types::DEGRADED)
            .map_or_else(|| now.trunc_subsecs(0), |c| c.last_transition_time);

        WatchdogDecision {
            state: WatchdogState::RecentlyDegraded {
                degraded_since,
                deadline: self.deadline(degraded_since),
            },
            status: builder.build(),
        }
    }
}
