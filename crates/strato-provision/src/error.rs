//! Provisioning error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Unknown stemcell: {0}")]
    UnknownStemcell(String),

    #[error("Cloud error: {0}")]
    Cloud(#[from] strato_cloud::CloudError),
}

impl ProvisionError {
    /// Whether this wraps a configuration/placement failure that occurred
    /// before any cloud call was made.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ProvisionError::Cloud(
                strato_cloud::CloudError::Configuration(_)
                    | strato_cloud::CloudError::PlacementConflict(_)
            )
        )
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
