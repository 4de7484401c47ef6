//! Instance creation request
//!
//! Assembled once per create call and immutable after submission. Optional
//! fields are omitted from the serialized request entirely when unset:
//! providers distinguish an absent field from an empty one (an absent
//! availability zone means "no preference", an absent key name means "no
//! key pair"), so none of these may default to `""` or `null`.

use serde::{Deserialize, Serialize};

/// Parameters for a single instance-creation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceRequest {
    /// Provider-unique instance name
    pub name: String,

    /// Boot image ID
    pub image_id: String,

    /// Provider instance type (e.g. "m1.small")
    pub instance_type: String,

    /// Placement zone; absent when no hint resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,

    /// Key pair name; absent when no candidate resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,

    /// Security groups. An empty list is a valid, explicit value.
    pub security_groups: Vec<String>,

    /// Subnet to attach to; present iff a manual network was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,

    /// Static private address; present only alongside `subnet_id`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_ip: Option<String>,

    /// Root device name from the image catalog, for the device mapping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_device_name: Option<String>,

    /// Opaque boot metadata handed to the guest
    pub user_data: String,
}

impl InstanceRequest {
    pub fn new(
        name: impl Into<String>,
        image_id: impl Into<String>,
        instance_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            image_id: image_id.into(),
            instance_type: instance_type.into(),
            availability_zone: None,
            key_name: None,
            security_groups: Vec::new(),
            subnet_id: None,
            private_ip: None,
            root_device_name: None,
            user_data: String::new(),
        }
    }

    /// Whether this is a subnet-attached (VPC-style) request
    pub fn is_subnet_attached(&self) -> bool {
        self.subnet_id.is_some()
    }
}
