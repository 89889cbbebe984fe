/// Ingress secret and secrets-manager instance operations
use super::client::ContainerServiceClient;
use super::models::{
    Instance, InstanceDeleteConfig, InstanceRegisterConfig, Secret, SecretCreateConfig,
    SecretDeleteConfig,
};
use crate::error::ApiError;

/// Ingress API, obtained from [`ContainerServiceClient::ingress`]
pub struct Ingress<'a> {
    client: &'a ContainerServiceClient,
}

impl<'a> Ingress<'a> {
    pub(crate) fn new(client: &'a ContainerServiceClient) -> Self {
        Self { client }
    }

    /// Create a TLS secret in a cluster from a certificate CRN
    pub async fn create_secret(&self, params: &SecretCreateConfig) -> Result<Secret, ApiError> {
        self.client
            .post("/v2/ingress/secret/createSecret", Some(params), &[])
            .await
    }

    /// Look up a TLS secret by cluster, name and namespace
    pub async fn get_secret(
        &self,
        cluster: &str,
        name: &str,
        namespace: &str,
    ) -> Result<Secret, ApiError> {
        self.client
            .get(
                &format!(
                    "/v2/ingress/secret/getSecret?cluster={cluster}&name={name}&namespace={namespace}"
                ),
                &[],
            )
            .await
    }

    /// Delete a TLS secret
    pub async fn delete_secret(&self, params: &SecretDeleteConfig) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .post("/v2/ingress/secret/deleteSecret", Some(params), &[])
            .await?;
        Ok(())
    }

    /// Register a secrets-manager instance with a cluster
    pub async fn register_instance(
        &self,
        params: &InstanceRegisterConfig,
    ) -> Result<Instance, ApiError> {
        self.client
            .post("/v2/ingress/instance/registerInstance", Some(params), &[])
            .await
    }

    /// Look up a registered secrets-manager instance
    pub async fn get_instance(&self, cluster: &str, name: &str) -> Result<Instance, ApiError> {
        self.client
            .get(
                &format!("/v2/ingress/instance/getInstance?cluster={cluster}&name={name}"),
                &[],
            )
            .await
    }

    /// Deregister a secrets-manager instance
    pub async fn delete_instance(&self, params: &InstanceDeleteConfig) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .post("/v2/ingress/instance/deleteInstance", Some(params), &[])
            .await?;
        Ok(())
    }
}
