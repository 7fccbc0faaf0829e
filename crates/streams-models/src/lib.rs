use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Instance Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    Accepted,
    Preparing,
    Provisioning,
    Ready,
    Failed,
    Deprovision,
    #[serde(alias = "deleting")]
    Deleted,
    #[serde(other)]
    Unknown,
}

impl InstanceStatus {
    /// Status that requires the user to type the instance name before deletion.
    pub const COMPLETED: InstanceStatus = InstanceStatus::Ready;

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Accepted => "accepted",
            InstanceStatus::Preparing => "preparing",
            InstanceStatus::Provisioning => "provisioning",
            InstanceStatus::Ready => "ready",
            InstanceStatus::Failed => "failed",
            InstanceStatus::Deprovision => "deprovision",
            InstanceStatus::Deleted => "deleted",
            InstanceStatus::Unknown => "unknown",
        }
    }

    /// True once the backend has started tearing the instance down.
    pub fn is_deleting(&self) -> bool {
        matches!(self, InstanceStatus::Deprovision | InstanceStatus::Deleted)
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    Standard,
    Developer,
    Eval,
    #[serde(other)]
    Unknown,
}

impl InstanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceType::Standard => "standard",
            InstanceType::Developer => "developer",
            InstanceType::Eval => "eval",
            InstanceType::Unknown => "unknown",
        }
    }

    /// Trial plans expire after a fixed number of hours.
    pub fn is_trial(&self) -> bool {
        matches!(self, InstanceType::Developer | InstanceType::Eval)
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub status: InstanceStatus,
    #[serde(default)]
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<InstanceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap_server_host: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trial size attached to an instance after the size lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSize {
    pub trial_duration_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizedInstance {
    #[serde(flatten)]
    pub instance: Instance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<InstanceSize>,
}

impl SizedInstance {
    pub fn without_size(instance: Instance) -> Self {
        Self {
            instance,
            size: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceList {
    pub page: u32,
    /// Number of items on this page.
    pub size: u32,
    pub total: u32,
    #[serde(default)]
    pub items: Vec<Instance>,
}

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInstanceRequest {
    pub name: String,
    pub cloud_provider: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeOwnerRequest {
    pub owner: String,
}

// ============================================================================
// Response Types - Sizes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportedInstanceTypesList {
    #[serde(default)]
    pub instance_types: Vec<SupportedInstanceType>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportedInstanceType {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub sizes: Vec<SupportedSize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportedSize {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub trial_duration_hours: Option<u32>,
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub operation_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_instance_list_page() {
        let body = r#"{
            "kind": "KafkaRequestList",
            "page": 1,
            "size": 1,
            "total": 7,
            "items": [{
                "id": "c7mi1ggsnrh2qf4dbmg0",
                "kind": "Kafka",
                "name": "serviceapi",
                "status": "deleting",
                "owner": "alice",
                "cloud_provider": "aws",
                "region": "us-east-1",
                "instance_type": "developer",
                "multi_az": false,
                "created_at": "2022-01-31T10:00:00Z",
                "updated_at": "2022-01-31T10:05:00Z"
            }]
        }"#;

        let list: InstanceList = serde_json::from_str(body).unwrap();
        assert_eq!(list.total, 7);
        assert_eq!(list.items.len(), 1);

        let instance = &list.items[0];
        assert_eq!(instance.status, InstanceStatus::Deleted);
        assert_eq!(instance.instance_type, Some(InstanceType::Developer));
        assert_eq!(instance.bootstrap_server_host, None);
    }

    #[test]
    fn test_unknown_status_and_type_are_tolerated() {
        let body = r#"{
            "name": "future",
            "status": "suspended",
            "instance_type": "enterprise",
            "created_at": "2022-01-31T10:00:00Z",
            "updated_at": "2022-01-31T10:00:00Z"
        }"#;

        let instance: Instance = serde_json::from_str(body).unwrap();
        assert_eq!(instance.status, InstanceStatus::Unknown);
        assert_eq!(instance.instance_type, Some(InstanceType::Unknown));
        assert!(instance.id.is_none());
        assert_eq!(instance.owner, "");
    }

    #[test]
    fn test_sized_instance_flattens_size() {
        let body = r#"{
            "id": "abc",
            "name": "dev",
            "status": "ready",
            "created_at": "2022-01-31T10:00:00Z",
            "updated_at": "2022-01-31T10:00:00Z"
        }"#;
        let instance: Instance = serde_json::from_str(body).unwrap();
        let sized = SizedInstance {
            instance,
            size: Some(InstanceSize {
                trial_duration_hours: 48,
            }),
        };

        let value = serde_json::to_value(&sized).unwrap();
        assert_eq!(value["name"], "dev");
        assert_eq!(value["size"]["trial_duration_hours"], 48);
    }

    #[test]
    fn test_without_size_omits_size_field() {
        let body = r#"{
            "id": "abc",
            "name": "dev",
            "status": "ready",
            "created_at": "2022-01-31T10:00:00Z",
            "updated_at": "2022-01-31T10:00:00Z"
        }"#;
        let sized = SizedInstance::without_size(serde_json::from_str(body).unwrap());

        assert_eq!(sized.size, None);
        let value = serde_json::to_value(&sized).unwrap();
        assert!(value.get("size").is_none());
    }

    #[test]
    fn test_completed_is_ready() {
        assert_eq!(InstanceStatus::COMPLETED, InstanceStatus::Ready);
        assert!(InstanceStatus::Deprovision.is_deleting());
        assert!(!InstanceStatus::Failed.is_deleting());
        assert!(InstanceType::Eval.is_trial());
        assert!(!InstanceType::Standard.is_trial());
    }
}
