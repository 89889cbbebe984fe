/// Authenticated HTTP core for the Armada container service
use std::sync::{Arc, RwLock};

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use super::clusters::Clusters;
use super::ingress::Ingress;
use super::models::RoutingHeader;
use super::subnets::Subnets;
use super::webhooks::Webhooks;
use super::worker_pools::WorkerPools;
use super::workers::Workers;
use crate::auth::{IamTokenRefresher, RefreshError, TokenRefresher};
use crate::config::{Config, Service};
use crate::error::ApiError;

const ORG_ID_HEADER: &str = "x-auth-resource-org";
const SPACE_ID_HEADER: &str = "x-auth-resource-space";
const ACCOUNT_ID_HEADER: &str = "x-auth-resource-account";

const INFRA_USERNAME_HEADER: &str = "x-auth-softlayer-username";
const INFRA_API_KEY_HEADER: &str = "x-auth-softlayer-apikey";

/// A single API request, built fresh per call
///
/// The before-send hook may mutate it. On a token-refresh retry the default
/// headers are rebuilt around it; the routing headers and body are reused.
#[derive(Debug)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

/// Hook invoked with the request before it is sent; an error aborts the call
pub type BeforeHook = Box<dyn Fn(&mut ApiRequest) -> Result<(), ApiError> + Send + Sync>;

/// Hook translating an application-level failure into the caller's error
pub type ErrorHook = Box<dyn Fn(StatusCode, &[u8]) -> ApiError + Send + Sync>;

/// Normalize a relative request path
///
/// Empty paths collapse to `/`, a missing leading slash is prepended, and
/// `.`/`..` segments and redundant separators are resolved lexically.
pub(crate) fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Project a routing header onto its named HTTP headers
pub(crate) fn apply_routing_header(value: &RoutingHeader, headers: &mut HeaderMap) {
    match value {
        RoutingHeader::Tenant(target) => {
            insert_header(headers, ORG_ID_HEADER, &target.org_id);
            insert_header(headers, SPACE_ID_HEADER, &target.space_id);
            insert_header(headers, ACCOUNT_ID_HEADER, &target.account_id);
        }
        RoutingHeader::Infra(credentials) => {
            insert_header(headers, INFRA_USERNAME_HEADER, &credentials.username);
            insert_header(headers, INFRA_API_KEY_HEADER, &credentials.api_key);
        }
    }
}

fn insert_header(headers: &mut HeaderMap, name: &'static str, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(parsed) => {
            headers.insert(name, parsed);
        }
        Err(_) => warn!("Dropping header {} with unrepresentable value", name),
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    // Operations without a response body decode into `()` or `Option<T>`
    if body.is_empty() {
        return serde_json::from_slice(b"null").map_err(ApiError::Decode);
    }
    serde_json::from_slice(body).map_err(ApiError::Decode)
}

/// Client for the Armada container service
///
/// Owns the resolved base endpoint, the HTTP transport, and the token
/// refresher. Resource accessors (`clusters()`, `workers()`, ...) share one
/// client and call its verb primitives.
pub struct ContainerServiceClient {
    config: Config,
    base_url: Url,
    http: reqwest::Client,
    token: RwLock<String>,
    refresher: Option<Arc<dyn TokenRefresher>>,
    before: Option<BeforeHook>,
    on_error: Option<ErrorHook>,
}

impl ContainerServiceClient {
    /// Create a client for the first-generation container endpoints
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Self::with_service(config, Service::Containers)
    }

    /// Create a client bound to a specific logical service
    ///
    /// The configuration is copied and the endpoint resolved up front, so an
    /// unresolvable endpoint fails here rather than on the first call.
    pub fn with_service(config: &Config, service: Service) -> Result<Self, ApiError> {
        let config = config.clone();
        let base_url = config.endpoint_for(service)?;
        let http = match &config.http_client {
            Some(client) => client.clone(),
            None => reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .map_err(|e| ApiError::Config(format!("failed to build HTTP transport: {e}")))?,
        };
        let refresher = IamTokenRefresher::new(http.clone(), &config)?;
        let token = RwLock::new(config.access_token.clone());

        Ok(Self {
            base_url,
            http,
            token,
            refresher: Some(Arc::new(refresher)),
            before: None,
            on_error: None,
            config,
        })
    }

    /// Replace the token refresher
    pub fn with_token_refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Disable transparent token refresh; a 401 is then surfaced as-is
    pub fn without_token_refresher(mut self) -> Self {
        self.refresher = None;
        self
    }

    /// Register a hook invoked with every request before it is sent
    pub fn with_before_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ApiRequest) -> Result<(), ApiError> + Send + Sync + 'static,
    {
        self.before = Some(Box::new(hook));
        self
    }

    /// Register a hook translating application-level failures
    pub fn with_error_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(StatusCode, &[u8]) -> ApiError + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(hook));
        self
    }

    /// Cluster operations
    pub fn clusters(&self) -> Clusters<'_> {
        Clusters::new(self)
    }

    /// Worker node operations
    pub fn workers(&self) -> Workers<'_> {
        Workers::new(self)
    }

    /// Worker pool operations
    pub fn worker_pools(&self) -> WorkerPools<'_> {
        WorkerPools::new(self)
    }

    /// Subnet operations
    pub fn subnets(&self) -> Subnets<'_> {
        Subnets::new(self)
    }

    /// Webhook operations
    pub fn webhooks(&self) -> Webhooks<'_> {
        Webhooks::new(self)
    }

    /// Ingress secret and instance operations
    pub fn ingress(&self) -> Ingress<'_> {
        Ingress::new(self)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        headers: &[RoutingHeader],
    ) -> Result<T, ApiError> {
        let request = self.build_request::<()>(Method::GET, path, None, headers)?;
        let body = self.dispatch(request).await?;
        decode(&body)
    }

    /// GET returning the raw body, for callers streaming to a file sink
    pub(crate) async fn get_raw(
        &self,
        path: &str,
        headers: &[RoutingHeader],
    ) -> Result<Vec<u8>, ApiError> {
        let request = self.build_request::<()>(Method::GET, path, None, headers)?;
        self.dispatch(request).await
    }

    pub(crate) async fn put<B, T>(
        &self,
        path: &str,
        body: Option<&B>,
        headers: &[RoutingHeader],
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.build_request(Method::PUT, path, body, headers)?;
        let body = self.dispatch(request).await?;
        decode(&body)
    }

    pub(crate) async fn post<B, T>(
        &self,
        path: &str,
        body: Option<&B>,
        headers: &[RoutingHeader],
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.build_request(Method::POST, path, body, headers)?;
        let body = self.dispatch(request).await?;
        decode(&body)
    }

    #[allow(dead_code)]
    pub(crate) async fn patch<B, T>(
        &self,
        path: &str,
        body: Option<&B>,
        headers: &[RoutingHeader],
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.build_request(Method::PATCH, path, body, headers)?;
        let body = self.dispatch(request).await?;
        decode(&body)
    }

    pub(crate) async fn delete(
        &self,
        path: &str,
        headers: &[RoutingHeader],
    ) -> Result<(), ApiError> {
        let request = self.build_request::<()>(Method::DELETE, path, None, headers)?;
        self.dispatch(request).await?;
        Ok(())
    }

    fn build_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        routing: &[RoutingHeader],
    ) -> Result<ApiRequest, ApiError> {
        let joined = format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            clean_path(path)
        );
        let url = Url::parse(&joined)
            .map_err(|e| ApiError::Config(format!("invalid request URL {joined:?}: {e}")))?;

        let mut headers = HeaderMap::new();
        for value in routing {
            apply_routing_header(value, &mut headers);
        }

        let body = match body {
            Some(payload) => Some(serde_json::to_value(payload).map_err(ApiError::Decode)?),
            None => None,
        };

        Ok(ApiRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Send a request, refreshing the token and retrying once on a 401
    async fn dispatch(&self, mut request: ApiRequest) -> Result<Vec<u8>, ApiError> {
        if let Some(before) = &self.before {
            before(&mut request)?;
        }

        let first = self.execute(&request).await?;

        // At most one transparent retry; a 401 on the retried attempt is
        // surfaced as-is.
        let (status, body) = match &self.refresher {
            Some(refresher) if first.0 == StatusCode::UNAUTHORIZED => {
                debug!("Authentication token probably expired, attempting refresh");
                match refresher.refresh_token().await {
                    Ok(token) => {
                        self.store_token(token);
                        self.execute(&request).await?
                    }
                    Err(RefreshError::InvalidToken(message)) => {
                        return Err(ApiError::InvalidToken(message));
                    }
                    Err(other) => return Err(ApiError::TokenRefresh(other.to_string())),
                }
            }
            _ => first,
        };

        if !status.is_success() {
            if let Some(on_error) = &self.on_error {
                return Err(on_error(status, &body));
            }
            return Err(ApiError::RequestFailed {
                status,
                description: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body)
    }

    /// Perform one HTTP exchange with freshly built default headers
    async fn execute(&self, request: &ApiRequest) -> Result<(StatusCode, Vec<u8>), ApiError> {
        let host = request.url.host_str().unwrap_or_default().to_string();

        let mut headers = self.default_headers();
        for (name, value) in request.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let mut builder = self
            .http
            .request(request.method.clone(), request.url.clone())
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!("{} {}", request.method, request.url);

        let response = builder.send().await.map_err(|e| ApiError::Network {
            host: host.clone(),
            source: e,
        })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network { host, source: e })?;

        Ok((status, body.to_vec()))
    }

    /// Bearer token plus standard identification headers
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        let token = match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        if !token.is_empty() {
            if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
                headers.insert(header::AUTHORIZATION, value);
            }
        }
        if let Ok(value) = HeaderValue::from_str(&self.config.user_agent) {
            headers.insert(header::USER_AGENT, value);
        }
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        headers
    }

    fn store_token(&self, token: String) {
        let mut guard = match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = token;
    }
}
