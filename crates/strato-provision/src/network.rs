//! Network attachment model
//!
//! The caller hands over a declarative map of network name to raw spec.
//! Each entry is classified exactly once, here, into one of three closed
//! variants; everything downstream matches on the variant and never looks
//! at the `type` string again.

use serde_json::Value;
use strato_cloud::{CloudError, Result};
use std::collections::BTreeMap;

/// A single classified network attachment request
#[derive(Debug, Clone)]
pub enum Network {
    /// Address allocated by the provider at boot
    Dynamic(DynamicNetwork),
    /// Caller-specified static address on a provider subnet
    Manual(ManualNetwork),
    /// Floating address attached after the instance is running
    Vip(VipNetwork),
}

impl Network {
    pub fn name(&self) -> &str {
        match self {
            Network::Dynamic(n) => &n.name,
            Network::Manual(n) => &n.name,
            Network::Vip(n) => &n.name,
        }
    }

    /// Security groups this network contributes to the creation request
    pub fn security_groups(&self) -> &[String] {
        match self {
            Network::Dynamic(n) => &n.security_groups,
            Network::Manual(n) => &n.security_groups,
            Network::Vip(_) => &[],
        }
    }
}

/// Network with provider-allocated addressing
#[derive(Debug, Clone)]
pub struct DynamicNetwork {
    pub name: String,
    pub security_groups: Vec<String>,
}

/// Network with a static address on a known subnet
#[derive(Debug, Clone)]
pub struct ManualNetwork {
    pub name: String,
    /// Provider-level subnet identifier, required
    pub subnet: String,
    /// Requested static private address
    pub ip: Option<String>,
    /// Resolvers for the guest, serialized into boot metadata
    pub dns: Vec<String>,
    pub security_groups: Vec<String>,
}

/// Floating address, associated post-creation
#[derive(Debug, Clone)]
pub struct VipNetwork {
    pub name: String,
    /// The floating address to associate
    pub ip: String,
}

/// The full classified set for one instance, iterated in name order
#[derive(Debug, Clone, Default)]
pub struct NetworkSet {
    networks: BTreeMap<String, Network>,
}

impl NetworkSet {
    /// Classify a raw `name -> spec` map.
    ///
    /// Fails with a configuration error naming the offending network when a
    /// manual entry lacks `cloud_properties.subnet`, a vip entry lacks an
    /// `ip`, or the declared type is unknown. An entry without a `type`
    /// field classifies as manual.
    pub fn from_spec(spec: &Value) -> Result<Self> {
        let entries = spec.as_object().ok_or_else(|| {
            CloudError::Configuration("network spec must be a mapping".to_string())
        })?;

        let mut networks = BTreeMap::new();
        for (name, raw) in entries {
            networks.insert(name.clone(), classify(name, raw)?);
        }

        Ok(Self { networks })
    }

    /// Networks in lexicographic name order
    pub fn iter(&self) -> impl Iterator<Item = &Network> {
        self.networks.values()
    }

    pub fn get(&self, name: &str) -> Option<&Network> {
        self.networks.get(name)
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Manual networks in name order
    pub fn manual(&self) -> impl Iterator<Item = &ManualNetwork> {
        self.iter().filter_map(|n| match n {
            Network::Manual(m) => Some(m),
            _ => None,
        })
    }

    /// Vip networks in name order
    pub fn vips(&self) -> impl Iterator<Item = &VipNetwork> {
        self.iter().filter_map(|n| match n {
            Network::Vip(v) => Some(v),
            _ => None,
        })
    }

    pub fn has_manual(&self) -> bool {
        self.manual().next().is_some()
    }
}

fn classify(name: &str, raw: &Value) -> Result<Network> {
    match raw.get("type").and_then(|t| t.as_str()) {
        Some("dynamic") => Ok(Network::Dynamic(DynamicNetwork {
            name: name.to_string(),
            security_groups: string_list(raw.get("cloud_properties"), "security_groups"),
        })),
        // No declared type means manual addressing by convention.
        Some("manual") | None => {
            let subnet = raw
                .get("cloud_properties")
                .and_then(|p| p.get("subnet"))
                .and_then(|s| s.as_str())
                .ok_or_else(|| {
                    CloudError::Configuration(format!(
                        "subnet required for manual network `{}'",
                        name
                    ))
                })?;
            Ok(Network::Manual(ManualNetwork {
                name: name.to_string(),
                subnet: subnet.to_string(),
                ip: raw.get("ip").and_then(|v| v.as_str()).map(String::from),
                dns: string_list(Some(raw), "dns"),
                security_groups: string_list(raw.get("cloud_properties"), "security_groups"),
            }))
        }
        Some("vip") => {
            let ip = raw.get("ip").and_then(|v| v.as_str()).ok_or_else(|| {
                CloudError::Configuration(format!("ip required for vip network `{}'", name))
            })?;
            Ok(Network::Vip(VipNetwork {
                name: name.to_string(),
                ip: ip.to_string(),
            }))
        }
        Some(other) => Err(CloudError::Configuration(format!(
            "invalid network type `{}' for network `{}'",
            other, name
        ))),
    }
}

fn string_list(container: Option<&Value>, key: &str) -> Vec<String> {
    container
        .and_then(|c| c.get(key))
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|i| i.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
