//! Strato Instance Provisioning
//!
//! This crate implements the instance-provisioning orchestrator: it turns
//! an abstract "create/terminate/reboot a virtual machine" request into
//! calls against a [`strato_cloud::ComputeProvider`], reconciling network
//! topology (dynamic, manual and floating addressing), placement
//! (availability-zone negotiation across networks and disks) and provider
//! eventual consistency (bounded polling of asynchronous state
//! transitions).
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use strato_provision::{InstanceManager, MemoryRegistry, ProvisionConfig, SizeSpec, StaticCatalog};
//!
//! let manager = InstanceManager::new(
//!     provider,
//!     Arc::new(MemoryRegistry::new("http://registry.internal:25777")),
//!     Arc::new(StaticCatalog::new().with_stemcell("stemcell-1", "/dev/sda1")),
//!     ProvisionConfig::default(),
//! );
//!
//! let size = SizeSpec { instance_type: "m1.small".into(), key_name: None };
//! let network_spec = serde_json::json!({"default": {"type": "dynamic"}});
//! let instance_id = manager
//!     .create("agent-1", "stemcell-1", &size, &network_spec, &[], None)
//!     .await?;
//! ```

pub mod config;
pub mod configurator;
pub mod error;
pub mod instance_manager;
pub mod network;
pub mod registry;
pub mod stemcell;
pub mod zones;

// Re-exports
pub use config::ProvisionConfig;
pub use configurator::{CreationNetworkParams, NetworkConfigurator};
pub use error::{ProvisionError, Result};
pub use instance_manager::{InstanceManager, SizeSpec};
pub use network::{DynamicNetwork, ManualNetwork, Network, NetworkSet, VipNetwork};
pub use registry::{InstanceSettings, MemoryRegistry, SettingsRegistry};
pub use stemcell::{StaticCatalog, StemcellCatalog};
pub use zones::{HintSource, ZoneHint, common_zone};
