//! Compute provider error types

use thiserror::Error;

/// Errors surfaced by providers and the lifecycle operations built on them
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Conflicting placement hints: {0}")]
    PlacementConflict(String),

    #[error("Transient provider error: {0}")]
    Transient(String),

    #[error("Resource not found: {0}")]
    ResourceMissing(String),

    #[error("Timed out waiting for {resource} after {attempts} attempts")]
    Timeout {
        resource: String,
        attempts: u32,
        #[source]
        last: Option<Box<CloudError>>,
    },

    #[error("Provider error: {0}")]
    Unhandled(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    /// The kind of this error, used to match against poll allow-lists.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CloudError::Configuration(_) => ErrorKind::Configuration,
            CloudError::PlacementConflict(_) => ErrorKind::PlacementConflict,
            CloudError::Transient(_) => ErrorKind::Transient,
            CloudError::ResourceMissing(_) => ErrorKind::ResourceMissing,
            CloudError::Timeout { .. } => ErrorKind::Timeout,
            CloudError::Unhandled(_) | CloudError::Json(_) => ErrorKind::Unhandled,
        }
    }
}

/// Error classification.
///
/// Whether a kind is recoverable is a per-call-site policy: polling a
/// freshly created instance tolerates `ResourceMissing` while the provider
/// catches up, and a termination poll treats the same kind as its success
/// condition. Callers pass the kinds they consider recoverable to
/// [`crate::poll::wait_for_resource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    PlacementConflict,
    Transient,
    ResourceMissing,
    Timeout,
    Unhandled,
}

pub type Result<T> = std::result::Result<T, CloudError>;
