//! Read-side Kubernetes surface consumed by the checks
//!
//! The checks only ever need two capabilities from the cluster: listing the
//! pods of a namespace and reading a named autoscaler. Keeping them behind a
//! trait keeps the checks testable against an in-memory snapshot.

use async_trait::async_trait;
use k8s_openapi::api::autoscaling::v1::HorizontalPodAutoscaler;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams};
use kube::Client;

use crate::error::Result;

#[async_trait]
pub trait ClusterReader: Send + Sync {
    /// List all pods in a namespace
    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>>;

    /// Read a HorizontalPodAutoscaler by name
    async fn read_autoscaler(&self, name: &str, namespace: &str)
        -> Result<HorizontalPodAutoscaler>;
}

/// `ClusterReader` backed by a live Kubernetes API client
///
/// Authentication (in-cluster service account or kubeconfig) is the
/// client's concern; `Client::try_default` picks whichever applies.
#[derive(Clone)]
pub struct KubeClusterReader {
    client: Client,
}

impl KubeClusterReader {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn try_default() -> Result<Self> {
        Ok(Self::new(Client::try_default().await?))
    }
}

#[async_trait]
impl ClusterReader for KubeClusterReader {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = pods.list(&ListParams::default()).await?;
        Ok(list.items)
    }

    async fn read_autoscaler(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<HorizontalPodAutoscaler> {
        let hpas: Api<HorizontalPodAutoscaler> = Api::namespaced(self.client.clone(), namespace);
        Ok(hpas.get(name).await?)
    }
}
