//! # Custom Resource Definitions
//!
//! Resource kinds the controller reads and writes.
//!
//! Neither kind is owned by this controller: `ClusterOperator` belongs to the
//! cluster version machinery and `PlatformOperator` to the platform API. Only
//! the fields the status layer needs are modelled; unknown fields are ignored
//! on read.

pub mod status;

pub use status::*;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// ClusterOperator resource
///
/// The status of a ClusterOperator is the document this controller maintains.
///
/// # Example
///
/// ```yaml
/// apiVersion: config.openshift.io/v1
/// kind: ClusterOperator
/// metadata:
///   name: platform-operators-core
/// spec: {}
/// ```
#[derive(CustomResource, Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[kube(
    kind = "ClusterOperator",
    group = "config.openshift.io",
    version = "v1",
    status = "ClusterOperatorStatus",
    shortname = "co",
    printcolumn = r#"{"name":"Version", "type":"string", "jsonPath":".status.versions[?(@.name==\"operator\")].version"}, {"name":"Available", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Available\")].status"}, {"name":"Progressing", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Progressing\")].status"}, {"name":"Degraded", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Degraded\")].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOperatorSpec {}

/// PlatformOperator resource
///
/// A declared optional operator package. Its `Applied` condition is what the
/// aggregated ClusterOperator summarises.
#[derive(CustomResource, Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[kube(
    kind = "PlatformOperator",
    group = "platform.openshift.io",
    version = "v1alpha1",
    status = "PlatformOperatorStatus",
    shortname = "po"
)]
#[serde(rename_all = "camelCase")]
pub struct PlatformOperatorSpec {
    /// Package to install from the catalog
    pub package: Package,
}

/// Package reference of a PlatformOperator
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// Package name in the catalog
    pub name: String,
}

/// Status of a PlatformOperator
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlatformOperatorStatus {
    /// Conditions reported by the platform operator reconciler
    #[serde(default)]
    pub conditions: Vec<Condition>,
    /// BundleDeployment currently backing this PlatformOperator
    #[serde(default)]
    pub active_bundle_deployment: Option<ActiveBundleDeployment>,
}

/// Reference to the BundleDeployment backing a PlatformOperator
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBundleDeployment {
    pub name: String,
}
