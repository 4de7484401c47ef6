//! Orchestrator configuration

use serde::{Deserialize, Serialize};
use strato_cloud::WaitConfig;

/// Tuning for the lifecycle operations.
///
/// Every field has a sensible default; deployments typically override only
/// the key name and, for slow providers, the create budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisionConfig {
    /// Fallback key pair used when the size spec names none
    #[serde(default)]
    pub default_key_name: Option<String>,

    /// Poll budget for an instance to reach running after create
    #[serde(default)]
    pub create_wait: WaitConfig,

    /// Retry budget for post-creation network configuration
    #[serde(default = "default_configure_wait")]
    pub configure_wait: WaitConfig,

    /// Poll budget for an instance to disappear after terminate
    #[serde(default)]
    pub terminate_wait: WaitConfig,
}

fn default_configure_wait() -> WaitConfig {
    // Association is a single idempotent call; a short budget is enough.
    WaitConfig {
        max_attempts: 5,
        ..WaitConfig::default()
    }
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            default_key_name: None,
            create_wait: WaitConfig::default(),
            configure_wait: default_configure_wait(),
            terminate_wait: WaitConfig::default(),
        }
    }
}
