/// Subnet operations
use super::client::ContainerServiceClient;
use super::models::{Subnet, TenantTarget};
use crate::error::ApiError;

/// Subnet API, obtained from [`ContainerServiceClient::subnets`]
pub struct Subnets<'a> {
    client: &'a ContainerServiceClient,
}

impl<'a> Subnets<'a> {
    pub(crate) fn new(client: &'a ContainerServiceClient) -> Self {
        Self { client }
    }

    /// List the portable subnets available to the account
    pub async fn list(&self, target: &TenantTarget) -> Result<Vec<Subnet>, ApiError> {
        self.client.get("/v1/subnets", &[target.into()]).await
    }

    /// Make an existing subnet routable from a cluster
    pub async fn add(
        &self,
        cluster: &str,
        subnet_id: &str,
        target: &TenantTarget,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .put::<(), _>(
                &format!("/v1/clusters/{cluster}/subnets/{subnet_id}"),
                None,
                &[target.into()],
            )
            .await?;
        Ok(())
    }
}
