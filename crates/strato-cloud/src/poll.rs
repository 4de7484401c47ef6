//! Bounded polling for eventually consistent resources
//!
//! Cloud APIs acknowledge a mutation before the resource reaches its final
//! state, and may briefly deny the resource exists at all right after
//! creation. [`wait_for_resource`] drives a probe until it reports the
//! target state, retrying recoverable errors within a bounded budget.

use crate::error::{CloudError, ErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Outcome of a single poll probe
#[derive(Debug)]
pub enum PollOutcome<T> {
    /// Target state reached
    Ready(T),
    /// Not there yet, probe again
    Pending,
}

/// Polling budget with exponential backoff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Maximum number of probe attempts
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the second attempt (ms)
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,
    /// Delay cap (ms)
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    /// Backoff multiplier; 1.0 gives a fixed interval
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_max_attempts() -> u32 {
    30
}
fn default_initial_delay() -> u64 {
    1000
}
fn default_max_delay() -> u64 {
    32000
}
fn default_multiplier() -> f64 {
    2.0
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            multiplier: default_multiplier(),
        }
    }
}

impl WaitConfig {
    /// Fixed-interval budget, mostly used by tests
    pub fn fixed(max_attempts: u32, interval_ms: u64) -> Self {
        Self {
            max_attempts,
            initial_delay_ms: interval_ms,
            max_delay_ms: interval_ms,
            multiplier: 1.0,
        }
    }

    /// Delay after the given attempt (0-based), in milliseconds
    pub fn delay_for_attempt(&self, attempt: u32) -> u64 {
        let delay = self.initial_delay_ms as f64 * self.multiplier.powi(attempt as i32);
        (delay as u64).min(self.max_delay_ms)
    }
}

/// Poll `probe` until it reports [`PollOutcome::Ready`].
///
/// `recoverable` is the caller's allow-list: a probe error whose
/// [`CloudError::kind`] appears in it counts as "not there yet" and the
/// poll continues; any other error aborts immediately. Exhausting the
/// budget yields [`CloudError::Timeout`] carrying the last observed error,
/// if any.
pub async fn wait_for_resource<T, F, Fut>(
    resource: &str,
    config: &WaitConfig,
    recoverable: &[ErrorKind],
    mut probe: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollOutcome<T>>>,
{
    let mut last_error: Option<CloudError> = None;

    for attempt in 0..config.max_attempts {
        match probe().await {
            Ok(PollOutcome::Ready(value)) => {
                tracing::debug!("{} ready after {} attempt(s)", resource, attempt + 1);
                return Ok(value);
            }
            Ok(PollOutcome::Pending) => {
                last_error = None;
            }
            Err(e) if recoverable.contains(&e.kind()) => {
                tracing::debug!("{} probe returned recoverable error: {}", resource, e);
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }

        // No sleep after the final attempt
        if attempt + 1 < config.max_attempts {
            sleep(Duration::from_millis(config.delay_for_attempt(attempt))).await;
        }
    }

    Err(CloudError::Timeout {
        resource: resource.to_string(),
        attempts: config.max_attempts,
        last: last_error.map(Box::new),
    })
}
