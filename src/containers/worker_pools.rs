/// Worker pool operations (second-generation VPC endpoints)
use super::client::ContainerServiceClient;
use super::models::{
    ResizeWorkerPoolRequest, TenantTarget, WorkerPool, WorkerPoolCreateResponse,
    WorkerPoolRequest,
};
use crate::error::ApiError;

/// Worker pool API, obtained from [`ContainerServiceClient::worker_pools`]
pub struct WorkerPools<'a> {
    client: &'a ContainerServiceClient,
}

impl<'a> WorkerPools<'a> {
    pub(crate) fn new(client: &'a ContainerServiceClient) -> Self {
        Self { client }
    }

    /// Create a worker pool in a cluster
    pub async fn create(
        &self,
        params: &WorkerPoolRequest,
        target: &TenantTarget,
    ) -> Result<WorkerPoolCreateResponse, ApiError> {
        self.client
            .post("/v2/vpc/createWorkerPool", Some(params), &[target.into()])
            .await
    }

    /// Look up a worker pool by cluster and pool name or ID
    pub async fn get(
        &self,
        cluster: &str,
        pool: &str,
        target: &TenantTarget,
    ) -> Result<WorkerPool, ApiError> {
        self.client
            .get(
                &format!("/v2/vpc/getWorkerPool?cluster={cluster}&workerpool={pool}"),
                &[target.into()],
            )
            .await
    }

    /// List the worker pools of a cluster
    pub async fn list(
        &self,
        cluster: &str,
        target: &TenantTarget,
    ) -> Result<Vec<WorkerPool>, ApiError> {
        self.client
            .get(
                &format!("/v2/vpc/getWorkerPools?cluster={cluster}"),
                &[target.into()],
            )
            .await
    }

    /// Change the per-zone worker count of a pool
    pub async fn resize(
        &self,
        params: &ResizeWorkerPoolRequest,
        target: &TenantTarget,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .post("/v2/resizeWorkerPool", Some(params), &[target.into()])
            .await?;
        Ok(())
    }

    /// Delete a worker pool from a cluster
    pub async fn delete(
        &self,
        cluster: &str,
        pool: &str,
        target: &TenantTarget,
    ) -> Result<(), ApiError> {
        self.client
            .delete(
                &format!("/v1/clusters/{cluster}/workerpools/{pool}"),
                &[target.into()],
            )
            .await
    }
}
