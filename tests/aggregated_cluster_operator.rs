mod common;

use chrono::Duration;
use common::{applied, condition, no_status, t0, ManualClock, MemoryLister, MemoryStore};
use platform_operators_controller::config::ControllerConfig;
use platform_operators_controller::constants::{
    AGGREGATED_CLUSTER_OPERATOR_NAME, CORE_CLUSTER_OPERATOR_NAME,
};
use platform_operators_controller::controller::reconciler::{
    AggregatedReconciler, PassOutcome, ReconcilerError,
};
use platform_operators_controller::crd::ConditionStatus;
use platform_operators_controller::runtime::initialization::ensure_cluster_operators;
use platform_operators_controller::status::condition_types::{AVAILABLE, DEGRADED, PROGRESSING};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const NAME: &str = AGGREGATED_CLUSTER_OPERATOR_NAME;

struct Harness {
    store: Arc<MemoryStore>,
    lister: Arc<MemoryLister>,
    clock: Arc<ManualClock>,
    reconciler: AggregatedReconciler,
}

impl Harness {
    fn new(children: Vec<platform_operators_controller::inspect::ChildSnapshot>) -> Self {
        let store = Arc::new(MemoryStore::with_operator(NAME));
        let lister = Arc::new(MemoryLister::with(children));
        let clock = Arc::new(ManualClock::at(t0()));
        let reconciler = AggregatedReconciler::new(
            &ControllerConfig::default(),
            Arc::clone(&store) as _,
            Arc::clone(&lister) as _,
            Arc::clone(&clock) as _,
        );
        Self {
            store,
            lister,
            clock,
            reconciler,
        }
    }

    async fn pass(&self) -> Result<PassOutcome, ReconcilerError> {
        self.reconciler.reconcile(NAME, &CancellationToken::new()).await
    }
}

#[tokio::test]
async fn no_children_is_available() {
    let h = Harness::new(Vec::new());

    assert_eq!(h.pass().await.unwrap(), PassOutcome::Settled);

    let status = h.store.status(NAME);
    let available = condition(&status, AVAILABLE);
    assert_eq!(available.status, ConditionStatus::True);
    assert_eq!(available.reason, "NoPOsFound");
    assert_eq!(available.message, "No POs are present in the cluster");
    let progressing = condition(&status, PROGRESSING);
    assert_eq!(progressing.status, ConditionStatus::False);
    assert_eq!(progressing.message, "No POs are present in the cluster");
    assert_eq!(condition(&status, DEGRADED).status, ConditionStatus::False);
    assert_eq!(status.related_objects.len(), 2);
}

#[tokio::test]
async fn failing_children_are_reported_in_order() {
    let h = Harness::new(vec![
        applied("a", ConditionStatus::False, "x"),
        applied("b", ConditionStatus::True, "ApplySuccessful"),
        applied("c", ConditionStatus::False, "y"),
    ]);

    h.pass().await.unwrap();

    let status = h.store.status(NAME);
    let available = condition(&status, AVAILABLE);
    assert_eq!(available.status, ConditionStatus::False);
    assert_eq!(available.reason, "POError");
    assert_eq!(
        available.message,
        r#"[encountered the failing a platform operator with reason "x", encountered the failing c platform operator with reason "y"]"#
    );
    assert_eq!(condition(&status, PROGRESSING).status, ConditionStatus::True);
    assert_eq!(condition(&status, DEGRADED).status, ConditionStatus::False);
}

#[tokio::test]
async fn children_without_status_are_pending() {
    let h = Harness::new(vec![
        applied("ready", ConditionStatus::True, ""),
        no_status("fresh"),
    ]);

    h.pass().await.unwrap();

    let available = condition(&h.store.status(NAME), AVAILABLE);
    assert_eq!(available.status, ConditionStatus::False);
    assert_eq!(available.reason, "POPending");
    assert!(available.message.contains("fresh"));
}

#[tokio::test]
async fn healthy_fleet_is_written_once() {
    let h = Harness::new(vec![
        applied("a", ConditionStatus::True, ""),
        applied("b", ConditionStatus::True, ""),
    ]);

    h.pass().await.unwrap();
    h.clock.advance(Duration::minutes(10));
    h.pass().await.unwrap();

    assert_eq!(h.store.write_count(), 1);
    let status = h.store.status(NAME);
    let available = condition(&status, AVAILABLE);
    assert_eq!(available.status, ConditionStatus::True);
    assert_eq!(available.reason, "POsHealthy");
    assert_eq!(available.message, "All POs in a successful state");
    assert_eq!(condition(&status, PROGRESSING).status, ConditionStatus::False);
}

#[tokio::test]
async fn recovery_updates_transition_time() {
    let h = Harness::new(vec![applied("a", ConditionStatus::False, "InstallFailed")]);
    h.pass().await.unwrap();
    assert_eq!(
        condition(&h.store.status(NAME), AVAILABLE).last_transition_time,
        t0()
    );

    h.clock.advance(Duration::minutes(1));
    h.lister.set(vec![applied("a", ConditionStatus::True, "")]);
    h.pass().await.unwrap();

    let available = condition(&h.store.status(NAME), AVAILABLE);
    assert_eq!(available.status, ConditionStatus::True);
    assert_eq!(available.last_transition_time, t0() + Duration::minutes(1));
    assert_eq!(h.store.write_count(), 2);
}

#[tokio::test]
async fn listing_failure_does_not_write() {
    let h = Harness::new(Vec::new());
    h.lister.break_listing();

    let err = h.pass().await.unwrap_err();

    assert!(matches!(err, ReconcilerError::Store(_)));
    assert!(!err.is_conflict());
    assert_eq!(h.store.write_count(), 0);
}

#[tokio::test]
async fn missing_operator_is_left_alone() {
    let store = Arc::new(MemoryStore::default());
    let reconciler = AggregatedReconciler::new(
        &ControllerConfig::default(),
        Arc::clone(&store) as _,
        Arc::new(MemoryLister::with(Vec::new())),
        Arc::new(ManualClock::at(t0())),
    );

    let outcome = reconciler.reconcile(NAME, &CancellationToken::new()).await.unwrap();

    assert_eq!(outcome, PassOutcome::Missing);
    assert!(!store.contains(NAME));
    assert_eq!(store.create_count(), 0);
}

#[tokio::test]
async fn bootstrap_creates_both_operators_once() {
    let store = MemoryStore::default();

    ensure_cluster_operators(&store).await.unwrap();
    ensure_cluster_operators(&store).await.unwrap();

    assert!(store.contains(CORE_CLUSTER_OPERATOR_NAME));
    assert!(store.contains(AGGREGATED_CLUSTER_OPERATOR_NAME));
    assert_eq!(store.create_count(), 2);
}
