//! In-memory collaborators for driving the reconcilers without a cluster.

#![allow(dead_code, reason = "Not every test binary uses every helper")]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use kube::ResourceExt;
use platform_operators_controller::crd::{
    ClusterOperator, ClusterOperatorSpec, ClusterOperatorStatus, Condition, ConditionStatus,
};
use platform_operators_controller::inspect::{ChildSnapshot, APPLIED_CONDITION_TYPE};
use platform_operators_controller::probe::HealthProbe;
use platform_operators_controller::status::find_status_condition;
use platform_operators_controller::store::{ChildLister, Clock, StatusStore, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// ClusterOperator store with optimistic concurrency on resourceVersion
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, ClusterOperator>>,
    next_version: AtomicUsize,
    pub writes: AtomicUsize,
    pub creates: AtomicUsize,
    pub fail_next_write_with_conflict: AtomicBool,
}

impl MemoryStore {
    pub fn with_operator(name: &str) -> Self {
        let store = Self::default();
        store.insert(ClusterOperator::new(name, ClusterOperatorSpec::default()));
        store
    }

    fn insert(&self, mut operator: ClusterOperator) -> ClusterOperator {
        let version = self.next_version.fetch_add(1, Ordering::SeqCst) + 1;
        operator.metadata.resource_version = Some(version.to_string());
        self.objects
            .lock()
            .unwrap()
            .insert(operator.name_any(), operator.clone());
        operator
    }

    pub fn status(&self, name: &str) -> ClusterOperatorStatus {
        self.objects
            .lock()
            .unwrap()
            .get(name)
            .and_then(|o| o.status.clone())
            .unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.lock().unwrap().contains_key(name)
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusStore for MemoryStore {
    async fn get(&self, name: &str) -> Result<Option<ClusterOperator>, StoreError> {
        Ok(self.objects.lock().unwrap().get(name).cloned())
    }

    async fn create(&self, name: &str) -> Result<ClusterOperator, StoreError> {
        if self.contains(name) {
            return Err(StoreError::Conflict {
                kind: "ClusterOperator",
                name: name.to_string(),
            });
        }
        self.creates.fetch_add(1, Ordering::SeqCst);
        Ok(self.insert(ClusterOperator::new(name, ClusterOperatorSpec::default())))
    }

    async fn write_status(&self, operator: &ClusterOperator) -> Result<(), StoreError> {
        let name = operator.name_any();
        let conflict = StoreError::Conflict {
            kind: "ClusterOperator",
            name: name.clone(),
        };
        if self.fail_next_write_with_conflict.swap(false, Ordering::SeqCst) {
            return Err(conflict);
        }

        let stored_version = self
            .objects
            .lock()
            .unwrap()
            .get(&name)
            .map(|o| o.metadata.resource_version.clone());
        match stored_version {
            None => {
                return Err(StoreError::NotFound {
                    kind: "ClusterOperator",
                    name,
                })
            }
            Some(version) if version != operator.metadata.resource_version => return Err(conflict),
            Some(_) => {}
        }

        self.writes.fetch_add(1, Ordering::SeqCst);
        self.insert(operator.clone());
        Ok(())
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Probe whose answer can be flipped between passes
#[derive(Debug)]
pub struct SwitchProbe(AtomicBool);

impl SwitchProbe {
    pub fn new(healthy: bool) -> Self {
        Self(AtomicBool::new(healthy))
    }

    pub fn set(&self, healthy: bool) {
        self.0.store(healthy, Ordering::SeqCst);
    }
}

#[async_trait]
impl HealthProbe for SwitchProbe {
    async fn check_availability(&self, _operator: &ClusterOperator) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Child lister returning a configurable listing
#[derive(Debug)]
pub struct MemoryLister(Mutex<Option<Vec<ChildSnapshot>>>);

impl MemoryLister {
    pub fn with(children: Vec<ChildSnapshot>) -> Self {
        Self(Mutex::new(Some(children)))
    }

    pub fn set(&self, children: Vec<ChildSnapshot>) {
        *self.0.lock().unwrap() = Some(children);
    }

    /// Make every listing fail
    pub fn break_listing(&self) {
        *self.0.lock().unwrap() = None;
    }
}

#[async_trait]
impl ChildLister for MemoryLister {
    async fn list_children(&self) -> Result<Vec<ChildSnapshot>, StoreError> {
        self.0
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| StoreError::Unavailable("listing failed".to_string()))
    }
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

pub fn applied(name: &str, status: ConditionStatus, reason: &str) -> ChildSnapshot {
    ChildSnapshot {
        name: name.to_string(),
        conditions: vec![Condition {
            r#type: APPLIED_CONDITION_TYPE.to_string(),
            status,
            last_transition_time: t0(),
            reason: reason.to_string(),
            message: String::new(),
        }],
    }
}

pub fn no_status(name: &str) -> ChildSnapshot {
    ChildSnapshot {
        name: name.to_string(),
        conditions: Vec::new(),
    }
}

pub fn condition(status: &ClusterOperatorStatus, condition_type: &str) -> Condition {
    find_status_condition(&status.conditions, condition_type)
        .cloned()
        .unwrap_or_else(|| panic!("missing {condition_type} condition"))
}
