/// Configuration for the Armada container service client
use std::time::Duration;

use url::Url;

use crate::error::ApiError;

/// Default region used when none is configured
const DEFAULT_REGION: &str = "us-south";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Logical services the endpoint resolver knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// First-generation container service endpoints (`/v1/...`)
    Containers,
    /// Second-generation VPC container endpoints (`/v2/...`)
    VpcContainers,
    /// Identity service used for token refresh
    Iam,
}

/// Client configuration
///
/// Each client derives its own copy at construction, so mutating a shared
/// `Config` afterwards never affects an already-constructed client.
#[derive(Debug, Clone)]
pub struct Config {
    /// Region used to derive default endpoints (e.g. "us-south")
    pub region: String,

    /// Explicit container service endpoint, overriding the regional default
    pub endpoint: Option<String>,

    /// Explicit identity endpoint, overriding the default
    pub iam_endpoint: Option<String>,

    /// Current bearer access token, without the "Bearer " prefix
    pub access_token: String,

    /// Refresh token exchanged at the identity endpoint on a 401
    pub refresh_token: String,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Request timeout applied to the HTTP transport
    pub timeout: Duration,

    /// Preconfigured HTTP transport; a default one is built when absent
    pub http_client: Option<reqwest::Client>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            iam_endpoint: None,
            access_token: String::new(),
            refresh_token: String::new(),
            user_agent: concat!("stevedore/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            http_client: None,
        }
    }
}

impl Config {
    /// Create a configuration with default endpoints and no credentials
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the region used for default endpoints
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Override the container service endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Override the identity endpoint
    pub fn with_iam_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.iam_endpoint = Some(endpoint.into());
        self
    }

    /// Set the initial bearer access token
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = token.into();
        self
    }

    /// Set the refresh token used on token expiry
    pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
        self.refresh_token = token.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Supply a preconfigured HTTP transport
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Resolve the base URL for a logical service
    ///
    /// Consulted once at client construction; an unresolvable service is a
    /// construction failure, never a per-request one.
    pub fn endpoint_for(&self, service: Service) -> Result<Url, ApiError> {
        let raw = match service {
            Service::Containers | Service::VpcContainers => match &self.endpoint {
                Some(ep) => ep.clone(),
                None => {
                    if self.region.is_empty() {
                        return Err(ApiError::Config(
                            "no endpoint configured and region is empty".to_string(),
                        ));
                    }
                    format!("https://{}.containers.armada.cloud", self.region)
                }
            },
            Service::Iam => self
                .iam_endpoint
                .clone()
                .unwrap_or_else(|| "https://iam.armada.cloud".to_string()),
        };

        Url::parse(&raw).map_err(|e| ApiError::Config(format!("invalid endpoint {raw:?}: {e}")))
    }
}
