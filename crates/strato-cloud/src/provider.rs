//! Compute provider trait definition

use crate::error::Result;
use crate::instance::InstanceView;
use crate::request::InstanceRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Compute provider abstraction trait
///
/// Every concrete backend implements this trait to expose the handful of
/// compute-API calls the lifecycle orchestrator needs. Implementations map
/// their transport's failures onto [`crate::CloudError`]; in particular a
/// transient-looking failure must become `Transient` and a missing-resource
/// response must become `ResourceMissing`, because recoverability decisions
/// upstream are made on those kinds alone.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    /// Returns the provider name (e.g. "ec2", "openstack")
    fn name(&self) -> &str;

    /// Submit an instance-creation request.
    ///
    /// Returns the provider-assigned instance ID. The call returning
    /// successfully does not mean the instance is usable yet; callers poll
    /// [`Self::get_instance`] until it reports running.
    async fn create_instance(&self, request: &InstanceRequest) -> Result<String>;

    /// Observe the current state of an instance
    async fn get_instance(&self, instance_id: &str) -> Result<InstanceView>;

    /// Request termination of an instance
    async fn terminate_instance(&self, instance_id: &str) -> Result<()>;

    /// Reboot an instance in place
    async fn reboot_instance(&self, instance_id: &str) -> Result<()>;

    /// Associate a floating address with a running instance.
    ///
    /// Re-associating an address already bound to the same instance is not
    /// an error.
    async fn associate_address(&self, instance_id: &str, address: &str) -> Result<()>;

    /// Resolve a subnet identifier to its provider handle and zone
    async fn lookup_subnet(&self, subnet_id: &str) -> Result<SubnetInfo>;

    /// Availability zone a volume currently lives in, if the provider
    /// exposes one. Used as a placement hint for disk locality.
    async fn lookup_volume_zone(&self, volume_id: &str) -> Result<Option<String>>;
}

/// Resolved subnet details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubnetInfo {
    /// Provider handle for the subnet
    pub id: String,

    /// Zone the subnet is pinned to, if any
    pub availability_zone: Option<String>,
}

impl SubnetInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            availability_zone: None,
        }
    }

    pub fn with_availability_zone(mut self, zone: impl Into<String>) -> Self {
        self.availability_zone = Some(zone.into());
        self
    }
}
