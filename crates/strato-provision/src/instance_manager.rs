//! Instance lifecycle orchestration
//!
//! [`InstanceManager`] owns the full lifecycle sequence for a single
//! instance: classify the requested networks, negotiate a zone, build the
//! creation request, submit it, poll the instance into its running state,
//! apply post-creation networking, and commit boot settings to the
//! registry. Teardown is idempotent: an instance that is already gone is a
//! success, not an error.
//!
//! Callers are expected to serialize operations per instance id; different
//! instance ids are independent and safe to drive in parallel.

use crate::config::ProvisionConfig;
use crate::configurator::NetworkConfigurator;
use crate::error::Result;
use crate::network::NetworkSet;
use crate::registry::{InstanceSettings, SettingsRegistry};
use crate::stemcell::StemcellCatalog;
use crate::zones::{ZoneHint, common_zone};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use strato_cloud::{
    CloudError, ComputeProvider, ErrorKind, InstanceRequest, InstanceStatus, PollOutcome,
    wait_for_resource,
};
use uuid::Uuid;

/// Instance sizing from the caller's resource pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeSpec {
    /// Provider instance type (e.g. "m1.small")
    pub instance_type: String,

    /// Key pair for this pool; takes precedence over the configured default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
}

/// Drives create/terminate/reboot against a compute provider
pub struct InstanceManager {
    provider: Arc<dyn ComputeProvider>,
    registry: Arc<dyn SettingsRegistry>,
    stemcells: Arc<dyn StemcellCatalog>,
    config: ProvisionConfig,
}

impl InstanceManager {
    pub fn new(
        provider: Arc<dyn ComputeProvider>,
        registry: Arc<dyn SettingsRegistry>,
        stemcells: Arc<dyn StemcellCatalog>,
        config: ProvisionConfig,
    ) -> Self {
        Self {
            provider,
            registry,
            stemcells,
            config,
        }
    }

    /// Create an instance and return its provider id.
    ///
    /// Configuration and placement problems abort before any cloud call.
    /// The registry entry is written last, so a failed create never leaves
    /// settings behind; a create failing after submission can leave a
    /// running, unregistered instance for the caller to reconcile.
    pub async fn create(
        &self,
        agent_id: &str,
        stemcell_id: &str,
        size: &SizeSpec,
        network_spec: &Value,
        disk_locality: &[String],
        env: Option<Value>,
    ) -> Result<String> {
        let networks = NetworkSet::from_spec(network_spec)?;
        let configurator = NetworkConfigurator::new(&networks);

        let mut hints = configurator.placement_hints(self.provider.as_ref()).await?;
        for volume_id in disk_locality {
            let zone = self.provider.lookup_volume_zone(volume_id).await?;
            hints.push(ZoneHint::disk(volume_id, zone));
        }
        let availability_zone = common_zone(&hints)?;

        let params = configurator.creation_params();
        let request = InstanceRequest {
            name: format!("strato-{}", Uuid::new_v4()),
            image_id: stemcell_id.to_string(),
            instance_type: size.instance_type.clone(),
            availability_zone,
            key_name: resolve_key_name(&[
                size.key_name.as_deref(),
                self.config.default_key_name.as_deref(),
            ]),
            security_groups: params.security_groups,
            subnet_id: params.subnet_id,
            private_ip: params.private_ip,
            root_device_name: Some(self.stemcells.root_device_name(stemcell_id).await?),
            user_data: build_user_data(self.registry.endpoint(), &params.dns_servers)?,
        };

        tracing::info!(
            "creating instance {} from {} in {}",
            request.name,
            stemcell_id,
            request.availability_zone.as_deref().unwrap_or("any zone")
        );
        let instance_id = self.provider.create_instance(&request).await?;

        self.wait_until_running(&instance_id).await?;
        configurator
            .configure(
                self.provider.as_ref(),
                &instance_id,
                &self.config.configure_wait,
            )
            .await?;

        let settings = InstanceSettings {
            agent_id: agent_id.to_string(),
            networks: network_spec.clone(),
            env,
        };
        self.registry.put_settings(&instance_id, &settings).await?;

        tracing::info!("instance {} is ready", instance_id);
        Ok(instance_id)
    }

    /// Tear down an instance and its registry entry.
    ///
    /// An instance that no longer exists, whether at the terminate call or
    /// while polling for it to disappear, is the desired end state rather
    /// than an error, so terminating twice is safe.
    pub async fn terminate(&self, instance_id: &str) -> Result<()> {
        tracing::info!("terminating instance {}", instance_id);

        match self.provider.terminate_instance(instance_id).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::ResourceMissing => {
                tracing::debug!("instance {} already gone", instance_id);
            }
            Err(e) => return Err(e.into()),
        }

        let outcome = self.wait_until_terminated(instance_id).await;

        // Settings are deleted even when the poll failed: leaking stale
        // settings for a half-dead instance is the worse outcome. The poll
        // error still propagates below.
        if let Err(e) = self.registry.delete_settings(instance_id).await {
            if outcome.is_ok() {
                return Err(e);
            }
            tracing::warn!(
                "could not delete settings for instance {}: {}",
                instance_id,
                e
            );
        }
        outcome?;

        tracing::info!("instance {} terminated", instance_id);
        Ok(())
    }

    /// Reboot an instance in place. No polling, no registry interaction.
    pub async fn reboot(&self, instance_id: &str) -> Result<()> {
        tracing::info!("rebooting instance {}", instance_id);
        self.provider
            .reboot_instance(instance_id)
            .await
            .map_err(Into::into)
    }

    async fn wait_until_running(&self, instance_id: &str) -> strato_cloud::Result<()> {
        let provider = self.provider.as_ref();
        // The provider may deny the instance exists for a few polls right
        // after create; missing stays recoverable until the budget runs out.
        wait_for_resource(
            &format!("instance {}", instance_id),
            &self.config.create_wait,
            &[ErrorKind::ResourceMissing, ErrorKind::Transient],
            || async move {
                let view = provider.get_instance(instance_id).await?;
                match view.status {
                    InstanceStatus::Running => Ok(PollOutcome::Ready(())),
                    InstanceStatus::Pending | InstanceStatus::Unknown => Ok(PollOutcome::Pending),
                    InstanceStatus::Stopping | InstanceStatus::Terminated => {
                        Err(CloudError::Unhandled(format!(
                            "instance {} entered state `{}' while waiting for it to start",
                            instance_id, view.status
                        )))
                    }
                }
            },
        )
        .await
    }

    async fn wait_until_terminated(&self, instance_id: &str) -> strato_cloud::Result<()> {
        let provider = self.provider.as_ref();
        wait_for_resource(
            &format!("instance {} teardown", instance_id),
            &self.config.terminate_wait,
            &[ErrorKind::Transient],
            || async move {
                match provider.get_instance(instance_id).await {
                    Ok(view) if view.is_terminated() => Ok(PollOutcome::Ready(())),
                    Ok(_) => Ok(PollOutcome::Pending),
                    // Gone entirely is exactly what we are waiting for.
                    Err(e) if e.kind() == ErrorKind::ResourceMissing => {
                        Ok(PollOutcome::Ready(()))
                    }
                    Err(e) => Err(e),
                }
            },
        )
        .await
    }
}

/// First present candidate wins; all absent means the field stays unset.
fn resolve_key_name(candidates: &[Option<&str>]) -> Option<String> {
    candidates
        .iter()
        .find_map(|candidate| candidate.map(String::from))
}

fn build_user_data(registry_endpoint: &str, dns_servers: &[String]) -> strato_cloud::Result<String> {
    let mut user_data = serde_json::json!({
        "registry": {"endpoint": registry_endpoint}
    });
    if !dns_servers.is_empty() {
        user_data["dns"] = serde_json::json!({"nameserver": dns_servers});
    }
    Ok(serde_json::to_string(&user_data)?)
}
