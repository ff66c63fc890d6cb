//! # ClusterOperator Status
//!
//! Status types for the ClusterOperator document and the condition shape shared
//! with child resources.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of the ClusterOperator resource
///
/// Equality ignores the order of conditions, versions and related objects but
/// not their multiplicity: each side is compared as a sorted multiset, so a
/// document holding a duplicate entry never equals one without it.
#[derive(Debug, Clone, Deserialize, Serialize, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOperatorStatus {
    /// Conditions describe the state of the operator's managed and monitored components
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// Versions of operands reported by the operator
    #[serde(default)]
    pub versions: Vec<OperandVersion>,
    /// Objects an administrator should look at when debugging the operator
    #[serde(default)]
    pub related_objects: Vec<ObjectReference>,
    /// Opaque operator-specific data, preserved as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<serde_json::Value>,
}

impl PartialEq for ClusterOperatorStatus {
    fn eq(&self, other: &Self) -> bool {
        self.extension == other.extension
            && sorted_conditions(&self.conditions) == sorted_conditions(&other.conditions)
            && sorted_versions(&self.versions) == sorted_versions(&other.versions)
            && sorted_refs(&self.related_objects) == sorted_refs(&other.related_objects)
    }
}

fn sorted_conditions(conditions: &[Condition]) -> Vec<&Condition> {
    let mut sorted: Vec<&Condition> = conditions.iter().collect();
    sorted.sort_by(|a, b| condition_key(a).cmp(&condition_key(b)));
    sorted
}

fn condition_key(c: &Condition) -> (&str, &str, DateTime<Utc>, &str, &str) {
    (
        &c.r#type,
        c.status.as_str(),
        c.last_transition_time,
        &c.reason,
        &c.message,
    )
}

fn sorted_versions(versions: &[OperandVersion]) -> Vec<(&str, &str)> {
    let mut sorted: Vec<(&str, &str)> = versions
        .iter()
        .map(|v| (v.name.as_str(), v.version.as_str()))
        .collect();
    sorted.sort_unstable();
    sorted
}

fn sorted_refs(refs: &[ObjectReference]) -> Vec<&ObjectReference> {
    let mut sorted: Vec<&ObjectReference> = refs.iter().collect();
    sorted.sort_unstable();
    sorted
}

impl Eq for ClusterOperatorStatus {}

/// Condition represents a single observation of a resource's state
///
/// Used both for ClusterOperator conditions and for the conditions reported by
/// child resources.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition (Available, Progressing, Degraded, Upgradeable, ...)
    pub r#type: String,
    /// Status of the condition (True, False, Unknown)
    pub status: ConditionStatus,
    /// Last time the status changed
    #[serde(default)]
    pub last_transition_time: DateTime<Utc>,
    /// Machine-readable reason for the status
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    /// Human-readable explanation of the status
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

/// Tri-state condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

impl ConditionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConditionStatus::True => "True",
            ConditionStatus::False => "False",
            ConditionStatus::Unknown => "Unknown",
        }
    }
}

impl From<bool> for ConditionStatus {
    fn from(value: bool) -> Self {
        if value {
            ConditionStatus::True
        } else {
            ConditionStatus::False
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version of a named operand
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperandVersion {
    /// Name of the operand ("operator" for the operator itself)
    pub name: String,
    /// Semantic version of the operand
    pub version: String,
}

/// Reference to an object related to the ClusterOperator
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize, Serialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct ObjectReference {
    /// API group of the referent ("" for the core group)
    #[serde(default)]
    pub group: String,
    /// Plural resource name of the referent
    pub resource: String,
    /// Namespace of the referent, empty for cluster-scoped resources
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    /// Name of the referent, empty to reference every object of the resource
    #[serde(default)]
    pub name: String,
}

impl ObjectReference {
    pub fn new(group: &str, resource: &str, namespace: &str, name: &str) -> Self {
        Self {
            group: group.to_string(),
            resource: resource.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn condition(type_: &str, status: ConditionStatus) -> Condition {
        Condition {
            r#type: type_.to_string(),
            status,
            last_transition_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            reason: String::new(),
            message: String::new(),
        }
    }

    #[test]
    fn test_status_equality_ignores_collection_order() {
        let a = ClusterOperatorStatus {
            conditions: vec![
                condition("Available", ConditionStatus::True),
                condition("Degraded", ConditionStatus::False),
            ],
            versions: vec![
                OperandVersion {
                    name: "operator".to_string(),
                    version: "4.12.0".to_string(),
                },
                OperandVersion {
                    name: "bundle".to_string(),
                    version: "1.0.0".to_string(),
                },
            ],
            related_objects: vec![
                ObjectReference::new("", "namespaces", "", "ns"),
                ObjectReference::new("platform.openshift.io", "platformoperators", "", ""),
            ],
            extension: None,
        };
        let mut b = a.clone();
        b.conditions.reverse();
        b.versions.reverse();
        b.related_objects.reverse();

        assert_eq!(a, b);
    }

    #[test]
    fn test_status_equality_detects_condition_change() {
        let a = ClusterOperatorStatus {
            conditions: vec![condition("Available", ConditionStatus::True)],
            ..Default::default()
        };
        let mut b = a.clone();
        b.conditions[0].message = "changed".to_string();

        assert_ne!(a, b);
    }

    #[test]
    fn test_status_equality_detects_version_change() {
        let a = ClusterOperatorStatus {
            versions: vec![OperandVersion {
                name: "operator".to_string(),
                version: "4.12.0".to_string(),
            }],
            ..Default::default()
        };
        let mut b = a.clone();
        b.versions[0].version = "4.13.0".to_string();

        assert_ne!(a, b);
    }

    #[test]
    fn test_status_equality_is_symmetric_with_duplicate_conditions() {
        let duplicated = ClusterOperatorStatus {
            conditions: vec![
                condition("Available", ConditionStatus::True),
                condition("Available", ConditionStatus::True),
            ],
            ..Default::default()
        };
        let distinct = ClusterOperatorStatus {
            conditions: vec![
                condition("Available", ConditionStatus::True),
                condition("Degraded", ConditionStatus::True),
            ],
            ..Default::default()
        };

        assert_ne!(duplicated, distinct);
        assert_ne!(distinct, duplicated);
    }

    #[test]
    fn test_status_equality_counts_duplicate_related_objects() {
        let reference = ObjectReference::new("", "namespaces", "", "ns");
        let once = ClusterOperatorStatus {
            related_objects: vec![reference.clone()],
            ..Default::default()
        };
        let twice = ClusterOperatorStatus {
            related_objects: vec![reference.clone(), reference],
            ..Default::default()
        };

        assert_ne!(once, twice);
        assert_ne!(twice, once);
        assert_eq!(twice, twice.clone());
    }

    #[test]
    fn test_condition_serialization_omits_empty_reason_and_message() {
        let json = serde_json::to_value(condition("Degraded", ConditionStatus::False)).unwrap();

        assert_eq!(json["type"], "Degraded");
        assert_eq!(json["status"], "False");
        assert_eq!(json["lastTransitionTime"], "2024-01-01T00:00:00Z");
        assert!(json.get("reason").is_none());
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_status_deserializes_from_api_shape() {
        let status: ClusterOperatorStatus = serde_json::from_value(serde_json::json!({
            "conditions": [{
                "type": "Degraded",
                "status": "True",
                "lastTransitionTime": "2024-01-01T00:00:15Z",
                "reason": "AvailabilityCheckFailed"
            }],
            "relatedObjects": [{"group": "", "resource": "namespaces", "name": "ns"}]
        }))
        .unwrap();

        assert_eq!(status.conditions.len(), 1);
        assert_eq!(status.conditions[0].status, ConditionStatus::True);
        assert_eq!(status.conditions[0].message, "");
        assert!(status.versions.is_empty());
        assert_eq!(
            status.related_objects,
            vec![ObjectReference::new("", "namespaces", "", "ns")]
        );
    }
}
