/// Error types for the Armada container service client
use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by client operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection, DNS, timeout)
    #[error("network failure calling {host}: {source}")]
    Network {
        host: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status
    #[error("request failed with status {status}: {description}")]
    RequestFailed {
        status: StatusCode,
        description: String,
    },

    /// The bearer token was rejected and could not be renewed
    #[error("authentication failed, token is invalid: {0}")]
    InvalidToken(String),

    /// Token renewal failed for a reason other than an invalid token
    #[error("authentication failed, unable to refresh auth token: {0}. Try again later")]
    TokenRefresh(String),

    /// The response body did not match the expected shape
    #[error("unexpected response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The client configuration is unusable
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A local precondition failed before any request was made
    #[error("{0}")]
    Precondition(String),
}

impl ApiError {
    /// HTTP status associated with this error, where one applies
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            ApiError::InvalidToken(_) => Some(StatusCode::UNAUTHORIZED),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accessor() {
        let err = ApiError::RequestFailed {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            description: "boom".to_string(),
        };
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));

        let err = ApiError::InvalidToken("expired".to_string());
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));

        let err = ApiError::Precondition("missing directory".to_string());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_refresh_error_message_mentions_retry() {
        let err = ApiError::TokenRefresh("identity endpoint unreachable".to_string());
        assert!(err.to_string().contains("Try again later"));
    }
}
