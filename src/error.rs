use std::io;
use std::path::PathBuf;

use bevy_ecs::entity::Entity;

use crate::sim::Tier;

/// Logic faults raised by simulation systems.
///
/// These indicate a bug in event ordering rather than a recoverable
/// condition, so they are surfaced from [`Simulation::tick`](crate::sim::Simulation::tick)
/// instead of being swallowed by the bus.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    /// A tier transition tried to leave a bucket that holds no settlements.
    #[error("tier underflow: settlement {settlement:?} left the {tier:?} bucket, which is empty")]
    TierUnderflow { settlement: Entity, tier: Tier },
}

/// Errors raised while loading or validating a [`SimConfig`](crate::config::SimConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
