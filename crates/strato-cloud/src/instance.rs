//! Observed instance state
//!
//! The provider owns the authoritative state of an instance; everything
//! here is a snapshot obtained through [`crate::ComputeProvider::get_instance`]
//! and may already be stale by the time it is inspected.

use serde::{Deserialize, Serialize};

/// Snapshot of an instance as last reported by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceView {
    /// Provider-assigned instance ID
    pub id: String,

    /// Status at observation time
    pub status: InstanceStatus,

    /// Floating address currently associated, if any
    pub floating_address: Option<String>,
}

impl InstanceView {
    pub fn new(id: impl Into<String>, status: InstanceStatus) -> Self {
        Self {
            id: id.into(),
            status,
            floating_address: None,
        }
    }

    pub fn with_floating_address(mut self, address: impl Into<String>) -> Self {
        self.floating_address = Some(address.into());
        self
    }

    /// Whether the instance has reached its usable state
    pub fn is_running(&self) -> bool {
        self.status == InstanceStatus::Running
    }

    /// Whether the instance has reached its terminal state
    pub fn is_terminated(&self) -> bool {
        self.status == InstanceStatus::Terminated
    }
}

/// Provider-reported lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    /// Creation accepted, instance not yet usable
    Pending,
    /// Instance is up
    Running,
    /// Termination in progress
    Stopping,
    /// Instance is gone
    Terminated,
    /// Status could not be determined
    Unknown,
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceStatus::Pending => write!(f, "pending"),
            InstanceStatus::Running => write!(f, "running"),
            InstanceStatus::Stopping => write!(f, "stopping"),
            InstanceStatus::Terminated => write!(f, "terminated"),
            InstanceStatus::Unknown => write!(f, "unknown"),
        }
    }
}
