/// Cluster operations
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;

use super::client::ContainerServiceClient;
use super::models::{
    ClusterCreateRequest, ClusterCreateResponse, ClusterInfo, InfraCredentials,
    ServiceBindRequest, ServiceBindResponse, TenantTarget,
};
use crate::error::ApiError;

/// Cluster API, obtained from [`ContainerServiceClient::clusters`]
pub struct Clusters<'a> {
    client: &'a ContainerServiceClient,
}

impl<'a> Clusters<'a> {
    pub(crate) fn new(client: &'a ContainerServiceClient) -> Self {
        Self { client }
    }

    /// Order a new cluster
    pub async fn create(
        &self,
        params: &ClusterCreateRequest,
        target: &TenantTarget,
    ) -> Result<ClusterCreateResponse, ApiError> {
        self.client
            .post("/v1/clusters", Some(params), &[target.into()])
            .await
    }

    /// List clusters visible in the target context
    pub async fn list(&self, target: &TenantTarget) -> Result<Vec<ClusterInfo>, ApiError> {
        self.client.get("/v1/clusters", &[target.into()]).await
    }

    /// Look up a single cluster by name or ID
    pub async fn find(&self, name: &str, target: &TenantTarget) -> Result<ClusterInfo, ApiError> {
        self.client
            .get(&format!("/v1/clusters/{name}"), &[target.into()])
            .await
    }

    /// Delete a cluster
    pub async fn delete(&self, name: &str, target: &TenantTarget) -> Result<(), ApiError> {
        self.client
            .delete(&format!("/v1/clusters/{name}"), &[target.into()])
            .await
    }

    /// Download the cluster's kubeconfig archive into `dir`
    ///
    /// The directory must already exist. Returns the path of the written
    /// archive; unpacking it is left to the caller.
    pub async fn config(
        &self,
        name: &str,
        dir: &Path,
        target: &TenantTarget,
    ) -> Result<PathBuf, ApiError> {
        if !dir.is_dir() {
            return Err(ApiError::Precondition(format!(
                "path {} to download the config does not exist",
                dir.display()
            )));
        }

        let archive = self
            .client
            .get_raw(&format!("/v1/clusters/{name}/config"), &[target.into()])
            .await?;

        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let download_path = dir.join(format!("{name}_kubeconfig-{nanos}.zip"));
        tokio::fs::write(&download_path, &archive)
            .await
            .map_err(|e| {
                ApiError::Precondition(format!(
                    "failed to write {}: {e}",
                    download_path.display()
                ))
            })?;

        info!("Downloaded the kubeconfig to {}", download_path.display());
        Ok(download_path)
    }

    /// Store infrastructure credentials for the target account
    pub async fn set_credentials(
        &self,
        credentials: &InfraCredentials,
        target: &TenantTarget,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .post::<(), _>(
                "/v1/credentials",
                None,
                &[target.into(), credentials.into()],
            )
            .await?;
        Ok(())
    }

    /// Remove the stored infrastructure credentials
    pub async fn unset_credentials(&self, target: &TenantTarget) -> Result<(), ApiError> {
        self.client.delete("/v1/credentials", &[target.into()]).await
    }

    /// Bind a service instance into a cluster namespace
    pub async fn bind_service(
        &self,
        params: &ServiceBindRequest,
        target: &TenantTarget,
    ) -> Result<ServiceBindResponse, ApiError> {
        let path = format!("/v1/clusters/{}/services", params.cluster);
        self.client.post(&path, Some(params), &[target.into()]).await
    }

    /// Remove a service binding from a cluster namespace
    pub async fn unbind_service(
        &self,
        cluster: &str,
        namespace_id: &str,
        service_guid: &str,
        target: &TenantTarget,
    ) -> Result<(), ApiError> {
        let path = format!("/v1/clusters/{cluster}/services/{namespace_id}/{service_guid}");
        self.client.delete(&path, &[target.into()]).await
    }
}
