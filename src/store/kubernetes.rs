//! # Kubernetes Store
//!
//! `StatusStore` and `ChildLister` backed by the Kubernetes API.

use super::{ChildLister, StatusStore, StoreError};
use crate::crd::{ClusterOperator, ClusterOperatorSpec, PlatformOperator};
use crate::inspect::ChildSnapshot;
use async_trait::async_trait;
use kube::api::{Api, ListParams, PostParams};
use kube::{Client, ResourceExt};
use std::fmt;
use tracing::debug;

const CLUSTER_OPERATOR_KIND: &str = "ClusterOperator";

/// ClusterOperator access through the API server
///
/// Status writes use `replace_status` with the observed `resourceVersion`, so
/// the API server rejects stale writes with 409.
#[derive(Clone)]
pub struct KubeStatusStore {
    api: Api<ClusterOperator>,
}

impl KubeStatusStore {
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::all(client),
        }
    }
}

impl fmt::Debug for KubeStatusStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeStatusStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl StatusStore for KubeStatusStore {
    async fn get(&self, name: &str) -> Result<Option<ClusterOperator>, StoreError> {
        Ok(self.api.get_opt(name).await?)
    }

    async fn create(&self, name: &str) -> Result<ClusterOperator, StoreError> {
        let operator = ClusterOperator::new(name, ClusterOperatorSpec::default());
        match self.api.create(&PostParams::default(), &operator).await {
            Ok(created) => Ok(created),
            Err(kube::Error::Api(api_err)) if api_err.code == 409 => Err(StoreError::Conflict {
                kind: CLUSTER_OPERATOR_KIND,
                name: name.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_status(&self, operator: &ClusterOperator) -> Result<(), StoreError> {
        let name = operator.name_any();
        let data = serde_json::to_vec(operator)?;

        match self
            .api
            .replace_status(&name, &PostParams::default(), data)
            .await
        {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(api_err)) if api_err.code == 409 => {
                debug!(
                    "Status write for ClusterOperator {} rejected: resourceVersion is stale",
                    name
                );
                Err(StoreError::Conflict {
                    kind: CLUSTER_OPERATOR_KIND,
                    name,
                })
            }
            Err(kube::Error::Api(api_err)) if api_err.code == 404 => Err(StoreError::NotFound {
                kind: CLUSTER_OPERATOR_KIND,
                name,
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// PlatformOperator listing through the API server
#[derive(Clone)]
pub struct KubeChildLister {
    api: Api<PlatformOperator>,
}

impl KubeChildLister {
    pub fn new(client: Client) -> Self {
        Self {
            api: Api::all(client),
        }
    }
}

impl fmt::Debug for KubeChildLister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KubeChildLister").finish_non_exhaustive()
    }
}

#[async_trait]
impl ChildLister for KubeChildLister {
    async fn list_children(&self) -> Result<Vec<ChildSnapshot>, StoreError> {
        let list = self.api.list(&ListParams::default()).await?;
        Ok(list.items.iter().map(ChildSnapshot::from).collect())
    }
}
