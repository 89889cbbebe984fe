/// Webhook operations
use super::client::ContainerServiceClient;
use super::models::{TenantTarget, Webhook};
use crate::error::ApiError;

/// Webhook API, obtained from [`ContainerServiceClient::webhooks`]
pub struct Webhooks<'a> {
    client: &'a ContainerServiceClient,
}

impl<'a> Webhooks<'a> {
    pub(crate) fn new(client: &'a ContainerServiceClient) -> Self {
        Self { client }
    }

    /// List the webhooks registered on a cluster
    pub async fn list(&self, cluster: &str, target: &TenantTarget) -> Result<Vec<Webhook>, ApiError> {
        self.client
            .get(&format!("/v1/clusters/{cluster}/webhooks"), &[target.into()])
            .await
    }

    /// Register a webhook on a cluster
    pub async fn add(
        &self,
        cluster: &str,
        webhook: &Webhook,
        target: &TenantTarget,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .client
            .post(
                &format!("/v1/clusters/{cluster}/webhooks"),
                Some(webhook),
                &[target.into()],
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ContainerServiceClient {
        let config = Config::new()
            .with_endpoint(server.uri())
            .with_access_token("test-token");
        ContainerServiceClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_add_posts_the_webhook() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/clusters/mycluster/webhooks"))
            .and(body_json(serde_json::json!({
                "level": "Warning",
                "type": "slack",
                "url": "https://hooks.example.com/services/T000",
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let webhook = Webhook {
            level: "Warning".to_string(),
            kind: "slack".to_string(),
            url: "https://hooks.example.com/services/T000".to_string(),
        };
        client
            .webhooks()
            .add("mycluster", &webhook, &TenantTarget::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_parses_webhooks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/clusters/mycluster/webhooks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"level": "Normal", "type": "slack", "url": "https://hooks.example.com/a"},
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let webhooks = client
            .webhooks()
            .list("mycluster", &TenantTarget::default())
            .await
            .unwrap();
        assert_eq!(webhooks.len(), 1);
        assert_eq!(webhooks[0].kind, "slack");
    }
}
