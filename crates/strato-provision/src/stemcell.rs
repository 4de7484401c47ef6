//! Stemcell catalog interface

use crate::error::{ProvisionError, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// Read-only image metadata lookup
#[async_trait]
pub trait StemcellCatalog: Send + Sync {
    /// Root device name of the given image, used for the creation
    /// request's device mapping.
    async fn root_device_name(&self, stemcell_id: &str) -> Result<String>;
}

/// Map-backed catalog, for tests and static deployments
#[derive(Debug, Default)]
pub struct StaticCatalog {
    devices: HashMap<String, String>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stemcell(
        mut self,
        stemcell_id: impl Into<String>,
        root_device_name: impl Into<String>,
    ) -> Self {
        self.devices
            .insert(stemcell_id.into(), root_device_name.into());
        self
    }
}

#[async_trait]
impl StemcellCatalog for StaticCatalog {
    async fn root_device_name(&self, stemcell_id: &str) -> Result<String> {
        self.devices
            .get(stemcell_id)
            .cloned()
            .ok_or_else(|| ProvisionError::UnknownStemcell(stemcell_id.to_string()))
    }
}
