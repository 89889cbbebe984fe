/// Worker node operations
use super::client::ContainerServiceClient;
use super::models::{TenantTarget, Worker, WorkerAction, WorkerUpdateParam};
use crate::error::ApiError;

/// Worker API, obtained from [`ContainerServiceClient::workers`]
pub struct Workers<'a> {
    client: &'a ContainerServiceClient,
}

impl<'a> Workers<'a> {
    pub(crate) fn new(client: &'a ContainerServiceClient) -> Self {
        Self { client }
    }

    /// List the worker nodes of a cluster
    pub async fn list(&self, cluster: &str, target: &TenantTarget) -> Result<Vec<Worker>, ApiError> {
        self.client
            .get(&format!("/v1/clusters/{cluster}/workers"), &[target.into()])
            .await
    }

    /// Look up a single worker by its ID
    pub async fn get(&self, worker_id: &str, target: &TenantTarget) -> Result<Worker, ApiError> {
        self.client
            .get(&format!("/v1/workers/{worker_id}"), &[target.into()])
            .await
    }

    /// Apply a lifecycle action (reboot, reload) to a worker
    pub async fn update(
        &self,
        cluster: &str,
        worker_id: &str,
        action: WorkerAction,
        target: &TenantTarget,
    ) -> Result<(), ApiError> {
        let param = WorkerUpdateParam { action };
        let _: serde_json::Value = self
            .client
            .put(
                &format!("/v1/clusters/{cluster}/workers/{worker_id}"),
                Some(&param),
                &[target.into()],
            )
            .await?;
        Ok(())
    }

    /// Remove a worker from its cluster
    pub async fn delete(
        &self,
        cluster: &str,
        worker_id: &str,
        target: &TenantTarget,
    ) -> Result<(), ApiError> {
        self.client
            .delete(
                &format!("/v1/clusters/{cluster}/workers/{worker_id}"),
                &[target.into()],
            )
            .await
    }
}
