//! Availability zone negotiation
//!
//! Zone hints are weak placement signals: a manual network's subnet is
//! pinned to a zone, and a disk the caller wants attached later already
//! lives in one. An instance can only satisfy all of them if they agree.

use strato_cloud::{CloudError, Result};

/// Where a zone hint came from, kept for conflict reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintSource {
    Network(String),
    Disk(String),
}

impl std::fmt::Display for HintSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HintSource::Network(name) => write!(f, "network `{}'", name),
            HintSource::Disk(id) => write!(f, "disk `{}'", id),
        }
    }
}

/// A candidate availability zone from one source
#[derive(Debug, Clone)]
pub struct ZoneHint {
    pub source: HintSource,
    pub zone: Option<String>,
}

impl ZoneHint {
    pub fn network(name: impl Into<String>, zone: Option<String>) -> Self {
        Self {
            source: HintSource::Network(name.into()),
            zone,
        }
    }

    pub fn disk(id: impl Into<String>, zone: Option<String>) -> Self {
        Self {
            source: HintSource::Disk(id.into()),
            zone,
        }
    }
}

/// Resolve a single zone from the given hints.
///
/// Hints without a zone are ignored. Returns `None` when nothing expressed
/// a preference, the common zone when all present hints agree, and a
/// placement-conflict error naming the disagreeing sources otherwise.
pub fn common_zone(hints: &[ZoneHint]) -> Result<Option<String>> {
    let mut resolved: Option<(&ZoneHint, &str)> = None;

    for hint in hints {
        let Some(zone) = hint.zone.as_deref() else {
            continue;
        };
        match resolved {
            None => resolved = Some((hint, zone)),
            Some((first, first_zone)) if first_zone != zone => {
                return Err(CloudError::PlacementConflict(format!(
                    "{} is in {}, but {} is in {}",
                    first.source, first_zone, hint.source, zone
                )));
            }
            Some(_) => {}
        }
    }

    Ok(resolved.map(|(_, zone)| zone.to_string()))
}
