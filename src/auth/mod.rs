/// Token refresh against the identity service
use std::sync::RwLock;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::{Config, Service};
use crate::error::ApiError;

/// Public client credentials accepted by the identity token endpoint
const TOKEN_CLIENT_CREDENTIALS: &str = "cli:cli";

/// Failures reported by a token refresh attempt
#[derive(Debug, Error)]
pub enum RefreshError {
    /// The refresh token itself was rejected; retrying cannot help
    #[error("token is invalid: {0}")]
    InvalidToken(String),

    /// The identity endpoint could not be reached
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Anything else the identity service reported
    #[error("{0}")]
    Other(String),
}

/// Obtains a fresh bearer token on demand
///
/// A successful call returns the new access token; the client stores it so
/// that default headers built afterwards carry it. Implementations must be
/// safe to invoke from concurrent calls.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh_token(&self) -> Result<String, RefreshError>;
}

/// Token pair returned by the identity service
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
}

/// Error body returned by the identity service
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    #[serde(default, rename = "errorCode")]
    error_code: String,
    #[serde(default, rename = "errorMessage")]
    error_message: String,
}

/// Refresher that exchanges a refresh token at the identity endpoint
///
/// The stored refresh token is rotated on every successful exchange, so the
/// cell is lock-guarded for concurrent callers.
pub struct IamTokenRefresher {
    http: reqwest::Client,
    token_url: Url,
    refresh_token: RwLock<String>,
}

impl IamTokenRefresher {
    /// Build a refresher bound to the given transport and configuration
    pub fn new(http: reqwest::Client, config: &Config) -> Result<Self, ApiError> {
        let base = config.endpoint_for(Service::Iam)?;
        let token_url = base
            .join("/identity/token")
            .map_err(|e| ApiError::Config(format!("invalid identity endpoint: {e}")))?;
        Ok(Self {
            http,
            token_url,
            refresh_token: RwLock::new(config.refresh_token.clone()),
        })
    }

    fn current_refresh_token(&self) -> String {
        match self.refresh_token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store_refresh_token(&self, token: String) {
        let mut guard = match self.refresh_token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = token;
    }
}

#[async_trait]
impl TokenRefresher for IamTokenRefresher {
    async fn refresh_token(&self) -> Result<String, RefreshError> {
        let refresh_token = self.current_refresh_token();
        if refresh_token.is_empty() {
            return Err(RefreshError::InvalidToken(
                "no refresh token configured".to_string(),
            ));
        }

        debug!("Exchanging refresh token at {}", self.token_url);

        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
        ];
        let response = self
            .http
            .post(self.token_url.clone())
            .header(
                header::AUTHORIZATION,
                format!("Basic {}", BASE64.encode(TOKEN_CLIENT_CREDENTIALS)),
            )
            .header(header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let detail = match serde_json::from_slice::<TokenErrorResponse>(&body) {
                Ok(err) if !err.error_message.is_empty() => {
                    format!("{}: {}", err.error_code, err.error_message)
                }
                _ => String::from_utf8_lossy(&body).into_owned(),
            };
            // 4xx from the token endpoint means the grant itself was refused
            if status.is_client_error() {
                return Err(RefreshError::InvalidToken(detail));
            }
            return Err(RefreshError::Other(format!(
                "identity endpoint answered {status}: {detail}"
            )));
        }

        let tokens: TokenResponse = serde_json::from_slice(&body)
            .map_err(|e| RefreshError::Other(format!("unexpected token response: {e}")))?;

        self.store_refresh_token(tokens.refresh_token);
        Ok(tokens.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn refresher_for(server: &MockServer) -> IamTokenRefresher {
        let config = Config::new()
            .with_iam_endpoint(server.uri())
            .with_refresh_token("refresh-1");
        IamTokenRefresher::new(reqwest::Client::new(), &config).unwrap()
    }

    #[tokio::test]
    async fn test_refresh_returns_new_access_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/identity/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "access-2",
                "refresh_token": "refresh-2",
                "token_type": "Bearer",
                "expires_in": 3600,
            })))
            .mount(&server)
            .await;

        let refresher = refresher_for(&server);
        let token = refresher.refresh_token().await.unwrap();
        assert_eq!(token, "access-2");
        // The next exchange must use the rotated refresh token
        assert_eq!(refresher.current_refresh_token(), "refresh-2");
    }

    #[tokio::test]
    async fn test_rejected_grant_is_invalid_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/identity/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "errorCode": "IAM0408E",
                "errorMessage": "provided refresh_token is expired",
            })))
            .mount(&server)
            .await;

        let refresher = refresher_for(&server);
        let err = refresher.refresh_token().await.unwrap_err();
        match err {
            RefreshError::InvalidToken(msg) => assert!(msg.contains("expired")),
            other => panic!("expected InvalidToken, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_not_invalid_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/identity/token"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let refresher = refresher_for(&server);
        let err = refresher.refresh_token().await.unwrap_err();
        assert!(matches!(err, RefreshError::Other(_)));
    }

    #[tokio::test]
    async fn test_missing_refresh_token_short_circuits() {
        let config = Config::new();
        let refresher = IamTokenRefresher::new(reqwest::Client::new(), &config).unwrap();
        let err = refresher.refresh_token().await.unwrap_err();
        assert!(matches!(err, RefreshError::InvalidToken(_)));
    }
}
