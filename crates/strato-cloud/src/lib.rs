//! Strato Compute Abstraction
//!
//! This crate provides the compute-provider abstraction for Strato: the
//! trait a cloud backend implements, the request/observed-state models
//! exchanged across it, the error taxonomy, and the bounded-poll primitive
//! used to ride out provider eventual consistency.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              orchestrator / director             │
//! └─────────────────┬───────────────────────────────┘
//!                   │ create / terminate / reboot
//! ┌─────────────────▼───────────────────────────────┐
//! │              strato-provision                    │
//! │   networks · zones · InstanceManager             │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               strato-cloud                       │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │        Provider Abstraction               │   │
//! │  │  trait ComputeProvider { ... }            │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │   Requests   │  │   Polling    │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────┐
//! │ concrete cloud │
//! │    backend     │
//! └───────────────┘
//! ```

pub mod error;
pub mod instance;
pub mod poll;
pub mod provider;
pub mod request;

// Re-exports
pub use error::{CloudError, ErrorKind, Result};
pub use instance::{InstanceStatus, InstanceView};
pub use poll::{PollOutcome, WaitConfig, wait_for_resource};
pub use provider::{ComputeProvider, SubnetInfo};
pub use request::InstanceRequest;
