//! Zone-level control and supervisory airflow arbitration for Coldzone.
//!
//! This crate holds the decision-making half of the control cycle. Each zone
//! runs an independent PID controller that turns a temperature error into a
//! damper demand, and a supervisory coordinator arbitrates those demands
//! against the shared system-wide airflow budget.
//!
//! # Architecture
//!
//! - Controllers own their state (integral, previous error); one per zone
//! - Demands and settings are `ZoneMap<f64>` percentages in [0, 100]
//! - The coordinator is stateless and purely proportional
//! - Controllers are sampled at a single fixed control period
//!
//! # Design Principles
//!
//! - **Cooling only**: a zone at or below its setpoint never opens its damper
//! - **Local then global**: per-zone demands are computed independently and
//!   only the coordinator sees all zones at once
//! - **Type Safety**: the closed `Zone` set makes per-zone state structural

pub mod coordinator;
pub mod error;
pub mod pid;
pub mod sampled;

pub use coordinator::{Coordination, DEFAULT_MAX_TOTAL_DAMPER, DamperCoordinator};
pub use error::{ControlError, ControlResult};
pub use pid::{ControlLimits, PidGains, ZoneControllerState, ZonePidBank, ZonePidController};
pub use sampled::{SampleClock, SampleConfig};
