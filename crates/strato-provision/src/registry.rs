//! Settings registry interface
//!
//! Instances pull their boot-time settings from an external registry keyed
//! by instance id. The registry itself is not part of this crate; the
//! orchestrator only writes an entry once an instance is running and
//! deletes it on teardown. Both operations are idempotent from this side.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Boot-time settings stored for one instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceSettings {
    /// Agent that will run on the instance
    pub agent_id: String,

    /// Network metadata, as the caller declared it
    pub networks: Value,

    /// Opaque environment blob from the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<Value>,
}

/// Key-value settings store keyed by instance id
#[async_trait]
pub trait SettingsRegistry: Send + Sync {
    /// Endpoint the guest will reach the registry at, embedded into boot
    /// metadata so the agent can fetch its settings.
    fn endpoint(&self) -> &str;

    /// Store settings for an instance, replacing any previous entry
    async fn put_settings(&self, instance_id: &str, settings: &InstanceSettings) -> Result<()>;

    /// Delete the settings for an instance.
    ///
    /// Deleting an entry that does not exist is not an error.
    async fn delete_settings(&self, instance_id: &str) -> Result<()>;
}

/// In-memory registry, for tests and single-process deployments
pub struct MemoryRegistry {
    endpoint: String,
    entries: RwLock<HashMap<String, InstanceSettings>>,
}

impl MemoryRegistry {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Current settings for an instance, if any
    pub async fn get(&self, instance_id: &str) -> Option<InstanceSettings> {
        self.entries.read().await.get(instance_id).cloned()
    }

    pub async fn contains(&self, instance_id: &str) -> bool {
        self.entries.read().await.contains_key(instance_id)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl SettingsRegistry for MemoryRegistry {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn put_settings(&self, instance_id: &str, settings: &InstanceSettings) -> Result<()> {
        tracing::debug!("storing settings for instance {}", instance_id);
        self.entries
            .write()
            .await
            .insert(instance_id.to_string(), settings.clone());
        Ok(())
    }

    async fn delete_settings(&self, instance_id: &str) -> Result<()> {
        let removed = self.entries.write().await.remove(instance_id).is_some();
        tracing::debug!(
            "deleted settings for instance {} (existed: {})",
            instance_id,
            removed
        );
        Ok(())
    }
}
