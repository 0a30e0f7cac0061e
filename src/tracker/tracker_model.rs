use serde::{Deserialize, Serialize};

use crate::snapshot::snapshot_model::SnapshotMode;

pub const DEFAULT_DRAIN_CYCLES: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerState {
    /// Nothing loaded; observations are ignored.
    Uninitialized,
    /// Form opened, baseline capture pending.
    Initializing,
    /// Baseline captured; observations are compared.
    Active,
    /// Transient window after a reset; observations are ignored.
    Resetting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    Uninitialized,
    Initializing,
    Resetting,
}

/// What `observe_change` did with a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Ignored(IgnoreReason),
    Evaluated { dirty: bool },
}

impl Observation {
    pub fn decision(&self) -> &'static str {
        match self {
            Observation::Ignored(IgnoreReason::Uninitialized) => "ignored:uninitialized",
            Observation::Ignored(IgnoreReason::Initializing) => "ignored:initializing",
            Observation::Ignored(IgnoreReason::Resetting) => "ignored:resetting",
            Observation::Evaluated { dirty: true } => "dirty",
            Observation::Evaluated { dirty: false } => "clean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub snapshot_mode: SnapshotMode,

    /// Ticks the resetting guard stays raised after `reset()`.
    #[serde(default = "default_drain_cycles")]
    pub drain_cycles: u32,

    /// Ticks to wait for a dependent field before capturing the baseline
    /// anyway. `None` waits forever.
    #[serde(default)]
    pub capture_timeout_cycles: Option<u32>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            snapshot_mode: SnapshotMode::InsertionOrder,
            drain_cycles: DEFAULT_DRAIN_CYCLES,
            capture_timeout_cycles: None,
        }
    }
}

fn default_drain_cycles() -> u32 { DEFAULT_DRAIN_CYCLES }
