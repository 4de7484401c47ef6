//! Network configuration
//!
//! Turns a classified [`NetworkSet`] into the network-derived fields of an
//! instance-creation request, and applies whatever could not be expressed
//! at creation time once the instance is running (floating addresses).

use crate::network::NetworkSet;
use crate::zones::ZoneHint;
use strato_cloud::{
    ComputeProvider, ErrorKind, PollOutcome, Result, WaitConfig, wait_for_resource,
};

/// Network-derived creation parameters.
///
/// `subnet_id` and `private_ip` are populated iff at least one manual
/// network is present; the provider treats a subnet-attached request as a
/// different shape, so these must be truly absent otherwise rather than
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreationNetworkParams {
    pub security_groups: Vec<String>,
    pub subnet_id: Option<String>,
    pub private_ip: Option<String>,
    pub dns_servers: Vec<String>,
}

/// Derives creation parameters and applies post-creation configuration
pub struct NetworkConfigurator<'a> {
    networks: &'a NetworkSet,
}

impl<'a> NetworkConfigurator<'a> {
    pub fn new(networks: &'a NetworkSet) -> Self {
        Self { networks }
    }

    /// Derive the network fields of the creation request.
    ///
    /// Networks apply in name order: security groups are the union with
    /// first occurrence kept; for single-valued fields (subnet, private IP,
    /// DNS list) the last manual network that specifies a value wins.
    pub fn creation_params(&self) -> CreationNetworkParams {
        let mut params = CreationNetworkParams::default();

        for network in self.networks.iter() {
            for group in network.security_groups() {
                if !params.security_groups.contains(group) {
                    params.security_groups.push(group.clone());
                }
            }
        }

        for manual in self.networks.manual() {
            params.subnet_id = Some(manual.subnet.clone());
            params.private_ip = manual.ip.clone();
            if !manual.dns.is_empty() {
                params.dns_servers = manual.dns.clone();
            }
        }

        params
    }

    /// Zone hints implied by the manual networks' subnets.
    ///
    /// Each manual subnet is resolved through the provider once per create
    /// call; subnets without a pinned zone contribute an empty hint.
    pub async fn placement_hints(
        &self,
        provider: &dyn ComputeProvider,
    ) -> Result<Vec<ZoneHint>> {
        let mut hints = Vec::new();
        for manual in self.networks.manual() {
            let subnet = provider.lookup_subnet(&manual.subnet).await?;
            hints.push(ZoneHint::network(&manual.name, subnet.availability_zone));
        }
        Ok(hints)
    }

    /// Apply post-creation network configuration to a running instance.
    ///
    /// Associates each vip network's floating address. Association is
    /// idempotent at the provider and retried on transient errors within
    /// the given budget; exhausting it leaves the instance running but
    /// unconfigured and surfaces the timeout.
    pub async fn configure(
        &self,
        provider: &dyn ComputeProvider,
        instance_id: &str,
        wait: &WaitConfig,
    ) -> Result<()> {
        for vip in self.networks.vips() {
            tracing::info!(
                "associating floating address {} with instance {}",
                vip.ip,
                instance_id
            );
            let address = vip.ip.as_str();
            wait_for_resource(
                &format!("floating address {}", address),
                wait,
                &[ErrorKind::Transient],
                || async move {
                    provider
                        .associate_address(instance_id, address)
                        .await
                        .map(PollOutcome::Ready)
                },
            )
            .await?;
        }
        Ok(())
    }
}
