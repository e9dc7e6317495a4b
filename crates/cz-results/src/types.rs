//! Result data types.

use cz_core::ZoneMap;
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub facility: String,
    pub started_at: String,
    pub finished_at: String,
    pub control_period_s: f64,
    pub cycles: u64,
    pub source: SourceKind,
    pub stop_reason: StopReason,
    pub controller_version: String,
}

/// Where the run's temperatures came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum SourceKind {
    Synthetic { seed: Option<u64> },
    Replay { from_run: RunId },
    External { description: String },
}

/// Why the loop left the running state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum StopReason {
    Interrupted,
    CycleLimit { max_cycles: u64 },
    SourceFailure { message: String },
}

/// Per-zone slice of a cycle snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ZoneSnapshot {
    /// Zone temperature after this cycle's cooling (°C, two decimals).
    pub temperature: f64,
    pub setpoint: f64,
    /// Coordinated damper setting (%).
    pub damper: f64,
}

/// Immutable record of one completed control cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CycleSnapshot {
    pub cycle: u64,
    pub zones: ZoneMap<ZoneSnapshot>,
    pub fan_power_kw: f64,
    pub energy_savings_percent: u32,
}
