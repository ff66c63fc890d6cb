//! # Status Writer
//!
//! Conditional status writes for ClusterOperators.
//!
//! A write is issued only when the freshly built document differs from the
//! observed one, so steady-state passes produce no API traffic and no watch
//! events. Store failures, including conflicts, are returned unchanged; the
//! caller re-reads and rebuilds.

use crate::crd::{ClusterOperator, ClusterOperatorStatus};
use crate::store::{StatusStore, StoreError};
use kube::ResourceExt;
use tracing::{debug, info};

/// Result of a status update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The document already matched; nothing was written
    Unchanged,
    /// The new document was written
    Written,
}

/// Writes ClusterOperator status documents through a [`StatusStore`]
#[derive(Clone, Copy)]
pub struct StatusWriter<'a> {
    store: &'a dyn StatusStore,
}

impl std::fmt::Debug for StatusWriter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusWriter").finish_non_exhaustive()
    }
}

impl<'a> StatusWriter<'a> {
    pub fn new(store: &'a dyn StatusStore) -> Self {
        Self { store }
    }

    /// Fetch the named ClusterOperator, creating an empty one if it is missing
    pub async fn ensure_exists(&self, name: &str) -> Result<ClusterOperator, StoreError> {
        if let Some(existing) = self.store.get(name).await? {
            return Ok(existing);
        }

        info!("ClusterOperator {} does not exist, creating it", name);
        self.store.create(name).await
    }

    /// Replace the observed status with `new_status` if they differ
    ///
    /// An absent status on the observed object compares equal to an empty
    /// document.
    pub async fn update_status(
        &self,
        existing: &ClusterOperator,
        new_status: ClusterOperatorStatus,
    ) -> Result<WriteOutcome, StoreError> {
        let unchanged = match existing.status.as_ref() {
            Some(current) => *current == new_status,
            None => ClusterOperatorStatus::default() == new_status,
        };
        if unchanged {
            debug!(
                "Skipping status update - ClusterOperator {} status unchanged",
                existing.name_any()
            );
            return Ok(WriteOutcome::Unchanged);
        }

        let mut updated = existing.clone();
        updated.status = Some(new_status);
        self.store.write_status(&updated).await?;

        debug!("Updated status of ClusterOperator {}", existing.name_any());
        Ok(WriteOutcome::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{ClusterOperatorSpec, Condition, ConditionStatus, ObjectReference};
    use crate::status::builder::StatusBuilder;
    use crate::status::condition::condition_types::{AVAILABLE, DEGRADED};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        existing: Mutex<Option<ClusterOperator>>,
        writes: Mutex<Vec<ClusterOperator>>,
        creates: Mutex<u32>,
        conflict: bool,
    }

    #[async_trait]
    impl StatusStore for RecordingStore {
        async fn get(&self, _name: &str) -> Result<Option<ClusterOperator>, StoreError> {
            Ok(self.existing.lock().unwrap().clone())
        }

        async fn create(&self, name: &str) -> Result<ClusterOperator, StoreError> {
            *self.creates.lock().unwrap() += 1;
            let created = ClusterOperator::new(name, ClusterOperatorSpec::default());
            *self.existing.lock().unwrap() = Some(created.clone());
            Ok(created)
        }

        async fn write_status(&self, operator: &ClusterOperator) -> Result<(), StoreError> {
            if self.conflict {
                return Err(StoreError::Conflict {
                    kind: "ClusterOperator",
                    name: operator.name_any(),
                });
            }
            self.writes.lock().unwrap().push(operator.clone());
            Ok(())
        }
    }

    fn operator_with(status: Option<ClusterOperatorStatus>) -> ClusterOperator {
        let mut operator = ClusterOperator::new("platform-operators-core", ClusterOperatorSpec::default());
        operator.status = status;
        operator
    }

    fn available_status() -> ClusterOperatorStatus {
        StatusBuilder::new()
            .set_condition(AVAILABLE, ConditionStatus::True, "AsExpected", "ok", Utc::now())
            .build()
    }

    #[tokio::test]
    async fn test_equal_document_is_not_written() {
        let store = RecordingStore::default();
        let writer = StatusWriter::new(&store);
        let status = available_status();

        let outcome = writer
            .update_status(&operator_with(Some(status.clone())), status)
            .await
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Unchanged);
        assert!(store.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_document_matches_absent_status() {
        let store = RecordingStore::default();
        let writer = StatusWriter::new(&store);

        let outcome = writer
            .update_status(&operator_with(None), StatusBuilder::new().build())
            .await
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Unchanged);
        assert!(store.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_changed_document_is_written_once() {
        let store = RecordingStore::default();
        let writer = StatusWriter::new(&store);
        let status = available_status();

        let outcome = writer
            .update_status(&operator_with(None), status.clone())
            .await
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Written);
        let writes = store.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].status.as_ref(), Some(&status));
    }

    #[tokio::test]
    async fn test_observed_duplicate_conditions_do_not_hide_a_change() {
        let store = RecordingStore::default();
        let writer = StatusWriter::new(&store);
        let mut observed = available_status();
        observed.conditions.push(observed.conditions[0].clone());
        let mut desired = available_status();
        desired.conditions[0] = observed.conditions[0].clone();
        desired.conditions.push(Condition {
            r#type: DEGRADED.to_string(),
            status: ConditionStatus::True,
            last_transition_time: observed.conditions[0].last_transition_time,
            reason: "AvailabilityCheckFailed".to_string(),
            message: String::new(),
        });

        let outcome = writer
            .update_status(&operator_with(Some(observed)), desired.clone())
            .await
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Written);
        let writes = store.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].status.as_ref(), Some(&desired));
    }

    #[tokio::test]
    async fn test_observed_duplicate_related_objects_are_rewritten() {
        let store = RecordingStore::default();
        let writer = StatusWriter::new(&store);
        let namespace = ObjectReference::new("", "namespaces", "", "openshift-platform-operators");
        let mut desired = available_status();
        desired.related_objects = vec![namespace.clone()];
        let mut observed = desired.clone();
        observed.related_objects.push(namespace);

        let outcome = writer
            .update_status(&operator_with(Some(observed)), desired)
            .await
            .unwrap();

        assert_eq!(outcome, WriteOutcome::Written);
        assert_eq!(store.writes.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_conflict_is_propagated() {
        let store = RecordingStore {
            conflict: true,
            ..Default::default()
        };
        let writer = StatusWriter::new(&store);

        let err = writer
            .update_status(&operator_with(None), available_status())
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert!(err.to_string().contains("precondition failed"));
    }

    #[tokio::test]
    async fn test_ensure_exists_creates_missing_operator_once() {
        let store = RecordingStore::default();
        let writer = StatusWriter::new(&store);

        let first = writer.ensure_exists("platform-operators-core").await.unwrap();
        let second = writer.ensure_exists("platform-operators-core").await.unwrap();

        assert_eq!(first.name_any(), "platform-operators-core");
        assert_eq!(second.name_any(), "platform-operators-core");
        assert_eq!(*store.creates.lock().unwrap(), 1);
    }
}
