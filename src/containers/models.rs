/// Data models for the Armada container service API
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Tenant context a call is routed to (organization, space, account)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantTarget {
    pub org_id: String,
    pub space_id: String,
    pub account_id: String,
}

/// Credentials for the secondary infrastructure provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfraCredentials {
    pub username: String,
    pub api_key: String,
}

/// Routing header attached to a request
///
/// Each variant projects onto a fixed set of named HTTP headers; new kinds
/// are added here, never at call sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingHeader {
    Tenant(TenantTarget),
    Infra(InfraCredentials),
}

impl From<&TenantTarget> for RoutingHeader {
    fn from(target: &TenantTarget) -> Self {
        RoutingHeader::Tenant(target.clone())
    }
}

impl From<&InfraCredentials> for RoutingHeader {
    fn from(credentials: &InfraCredentials) -> Self {
        RoutingHeader::Infra(credentials.clone())
    }
}

/// Cluster as reported by the service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterInfo {
    pub id: String,
    pub guid: String,
    pub name: String,
    pub region: String,
    pub location: String,
    pub data_center: String,
    #[serde(rename = "serverURL")]
    pub server_url: String,
    pub state: String,
    pub created_date: String,
    pub modified_date: String,
    pub master_kube_version: String,
    pub ingress_hostname: String,
    pub ingress_secret_name: String,
    pub worker_count: u32,
    pub is_paid: bool,
}

/// Parameters for creating a cluster
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCreateRequest {
    pub name: String,
    pub datacenter: String,
    pub machine_type: String,
    pub worker_num: u32,
    pub private_vlan: String,
    pub public_vlan: String,
    pub billing: String,
    pub isolation: String,
    pub no_subnet: bool,
}

/// Response to a cluster creation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterCreateResponse {
    pub id: String,
}

/// Parameters for binding a service instance into a cluster namespace
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceBindRequest {
    /// Cluster name or ID; part of the path, not the payload
    #[serde(skip)]
    pub cluster: String,
    #[serde(rename = "spaceGUID")]
    pub space_guid: String,
    #[serde(rename = "serviceInstanceGUID")]
    pub service_instance: String,
    #[serde(rename = "namespaceID")]
    pub namespace_id: String,
}

/// Response to a service binding
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceBindResponse {
    #[serde(rename = "serviceInstanceGUID")]
    pub service_instance_guid: String,
    #[serde(rename = "namespaceID")]
    pub namespace_id: String,
    #[serde(rename = "secretName")]
    pub secret_name: String,
    pub binding: String,
}

/// Worker node of a cluster
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Worker {
    pub id: String,
    pub state: String,
    pub status: String,
    pub machine_type: String,
    pub kube_version: String,
    pub private_vlan: String,
    pub public_vlan: String,
    #[serde(rename = "privateIP")]
    pub private_ip: String,
    #[serde(rename = "publicIP")]
    pub public_ip: String,
    pub isolation: String,
    pub billing: String,
    pub error_message: String,
}

/// Lifecycle action applied to a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerAction {
    Reboot,
    Reload,
}

/// Body of a worker update call
#[derive(Debug, Clone, Serialize)]
pub struct WorkerUpdateParam {
    pub action: WorkerAction,
}

/// Notification webhook registered on a cluster
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Webhook {
    pub level: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

/// Portable subnet available to the account
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Subnet {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub vlan_id: String,
    pub ip_addresses: Vec<String>,
    pub properties: SubnetProperties,
}

/// Addressing details of a subnet
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubnetProperties {
    pub cidr: String,
    pub network_identifier: String,
    pub note: String,
    pub subnet_type: String,
    pub display_label: String,
    pub gateway: String,
}

/// Zone placement for a worker pool being created
#[derive(Debug, Clone, Default, Serialize)]
pub struct Zone {
    pub id: String,
    #[serde(rename = "subnetID")]
    pub subnet_id: String,
}

/// Zone of an existing worker pool
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoneResponse {
    pub id: String,
    pub subnets: Vec<ZoneSubnet>,
    pub worker_count: u32,
}

/// Subnet attachment within a worker pool zone
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ZoneSubnet {
    pub id: String,
    pub primary: bool,
}

/// Worker volume encryption settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerVolumeEncryption {
    #[serde(rename = "kmsInstanceID")]
    pub kms_instance_id: String,
    #[serde(rename = "workerVolumeCRKID")]
    pub worker_volume_crk_id: String,
    #[serde(rename = "kmsAccountID", skip_serializing_if = "String::is_empty")]
    pub kms_account_id: String,
}

/// Worker pool settings shared between create and update calls
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonWorkerPoolConfig {
    pub name: String,
    pub flavor: String,
    #[serde(rename = "vpcID")]
    pub vpc_id: String,
    pub worker_count: u32,
    pub zones: Vec<Zone>,
    pub entitlement: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub operating_system: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_volume_encryption: Option<WorkerVolumeEncryption>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secondary_storage_option: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

/// Parameters for creating a worker pool
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkerPoolRequest {
    pub cluster: String,
    #[serde(rename = "hostPool", skip_serializing_if = "String::is_empty")]
    pub host_pool_id: String,
    #[serde(flatten)]
    pub config: CommonWorkerPoolConfig,
}

/// Response to a worker pool creation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkerPoolCreateResponse {
    #[serde(rename = "workerPoolID")]
    pub worker_pool_id: String,
}

/// Actual/desired state pair of a worker pool
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lifecycle {
    pub actual_state: String,
    pub desired_state: String,
}

/// Secondary disk configuration of a worker pool
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiskConfig {
    #[serde(rename = "Count")]
    pub count: u32,
    #[serde(rename = "DeviceType")]
    pub device_type: String,
    #[serde(rename = "RAIDConfiguration")]
    pub raid_configuration: String,
    #[serde(rename = "Size")]
    pub size: u32,
    pub name: String,
    pub profile: String,
}

/// Worker pool as reported by the service
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkerPool {
    pub id: String,
    pub pool_name: String,
    pub flavor: String,
    pub provider: String,
    pub isolation: String,
    #[serde(rename = "vpcID")]
    pub vpc_id: String,
    pub worker_count: u32,
    pub lifecycle: Lifecycle,
    #[serde(rename = "dedicatedHostPoolId")]
    pub host_pool_id: String,
    pub operating_system: String,
    pub zones: Vec<ZoneResponse>,
    pub worker_volume_encryption: Option<WorkerVolumeEncryption>,
    pub secondary_storage_option: Option<DiskConfig>,
}

/// Parameters for resizing a worker pool
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResizeWorkerPoolRequest {
    pub cluster: String,
    pub workerpool: String,
    pub size: u32,
}

/// Parameters for creating an ingress TLS secret
#[derive(Debug, Clone, Default, Serialize)]
pub struct SecretCreateConfig {
    pub cluster: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    pub crn: String,
    pub persistence: bool,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

/// Parameters for deleting an ingress TLS secret
#[derive(Debug, Clone, Default, Serialize)]
pub struct SecretDeleteConfig {
    pub cluster: String,
    pub name: String,
    pub namespace: String,
}

/// Ingress TLS secret as reported by the service
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Secret {
    pub cluster: String,
    pub name: String,
    pub namespace: String,
    pub domain: String,
    pub crn: String,
    pub expires_on: String,
    pub status: String,
    pub user_managed: bool,
    pub persistence: bool,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Parameters for registering a secrets-manager instance
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceRegisterConfig {
    pub cluster: String,
    pub crn: String,
    pub is_default: bool,
    #[serde(rename = "secretGroupID", skip_serializing_if = "String::is_empty")]
    pub secret_group_id: String,
}

/// Parameters for deregistering a secrets-manager instance
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstanceDeleteConfig {
    pub cluster: String,
    pub name: String,
}

/// Registered secrets-manager instance
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Instance {
    pub cluster: String,
    pub name: String,
    pub crn: String,
    pub is_default: bool,
    #[serde(rename = "secretGroupID")]
    pub secret_group_id: String,
    pub secret_group_name: String,
    pub status: String,
    pub user_managed: bool,
    #[serde(rename = "type")]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_pool_request_omits_empty_optionals() {
        let request = WorkerPoolRequest {
            cluster: "bm64u3ed02o93vv36hb0".to_string(),
            host_pool_id: String::new(),
            config: CommonWorkerPoolConfig {
                name: "mywork211".to_string(),
                flavor: "b2.4x16".to_string(),
                vpc_id: "6015365a-9d93-4bb4-8248-79ae0db2dc26".to_string(),
                worker_count: 1,
                ..Default::default()
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("hostPool"));
        assert!(!object.contains_key("operatingSystem"));
        assert!(!object.contains_key("workerVolumeEncryption"));
        assert!(!object.contains_key("secondaryStorageOption"));
        // Entitlement and zones are always present, even when empty
        assert_eq!(object["entitlement"], "");
        assert_eq!(object["zones"], serde_json::json!([]));
        assert_eq!(object["vpcID"], "6015365a-9d93-4bb4-8248-79ae0db2dc26");
    }

    #[test]
    fn test_worker_pool_response_parses_secondary_storage() {
        let raw = serde_json::json!({
            "flavor": "flavor1",
            "id": "id1",
            "lifecycle": {"actualState": "actual", "desiredState": "desired"},
            "operatingSystem": "REDHAT_7_64",
            "poolName": "name1",
            "provider": "provider1",
            "vpcID": "vpcid1",
            "workerCount": 0,
            "secondaryStorageOption": {
                "Count": 1,
                "DeviceType": "devtype1",
                "RAIDConfiguration": "config1",
                "Size": 2,
                "name": "name3",
                "profile": "profile3"
            }
        });

        let pool: WorkerPool = serde_json::from_value(raw).unwrap();
        assert_eq!(pool.pool_name, "name1");
        assert_eq!(pool.lifecycle.desired_state, "desired");
        assert_eq!(
            pool.secondary_storage_option,
            Some(DiskConfig {
                count: 1,
                device_type: "devtype1".to_string(),
                raid_configuration: "config1".to_string(),
                size: 2,
                name: "name3".to_string(),
                profile: "profile3".to_string(),
            })
        );
    }

    #[test]
    fn test_cluster_info_parses_service_fields() {
        let raw = serde_json::json!({
            "id": "c1",
            "name": "mycluster",
            "region": "us-south",
            "dataCenter": "dal10",
            "serverURL": "https://c1.example:31600",
            "masterKubeVersion": "1.29.4",
            "workerCount": 3,
            "isPaid": true
        });

        let info: ClusterInfo = serde_json::from_value(raw).unwrap();
        assert_eq!(info.server_url, "https://c1.example:31600");
        assert_eq!(info.data_center, "dal10");
        assert_eq!(info.worker_count, 3);
        assert!(info.is_paid);
        assert!(info.state.is_empty());
    }

    #[test]
    fn test_worker_action_serializes_lowercase() {
        let param = WorkerUpdateParam {
            action: WorkerAction::Reboot,
        };
        assert_eq!(
            serde_json::to_value(&param).unwrap(),
            serde_json::json!({"action": "reboot"})
        );
    }
}
