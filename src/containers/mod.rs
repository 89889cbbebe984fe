/// Armada container service API client implementation
pub mod client;
pub mod clusters;
pub mod ingress;
pub mod models;
pub mod subnets;
pub mod webhooks;
pub mod worker_pools;
pub mod workers;

pub use client::{ApiRequest, BeforeHook, ContainerServiceClient, ErrorHook};
pub use models::{InfraCredentials, RoutingHeader, TenantTarget};
