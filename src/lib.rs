/// Stevedore - typed async client for the Armada managed Kubernetes service
///
/// The [`containers::ContainerServiceClient`] owns the authenticated HTTP
/// core (bearer auth with transparent token refresh, tenant routing headers);
/// resource accessors such as [`containers::clusters::Clusters`] map typed
/// operations onto it.
pub mod auth;
pub mod config;
pub mod containers;
pub mod error;

pub use auth::{IamTokenRefresher, RefreshError, TokenRefresher};
pub use config::{Config, Service};
pub use containers::{ContainerServiceClient, InfraCredentials, RoutingHeader, TenantTarget};
pub use error::ApiError;
