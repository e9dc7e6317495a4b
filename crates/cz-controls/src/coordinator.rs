//! Supervisory damper coordination.
//!
//! The only cross-zone coupling in the control cycle. Zone controllers ask for
//! airflow independently; the coordinator enforces the shared fan capacity by
//! shrinking every demand by the same factor when their sum exceeds the
//! budget. No zone is prioritized, so no zone is starved while another keeps
//! its full demand.

use crate::error::{ControlError, ControlResult};
use cz_core::{ZoneMap, ensure_finite, round_to};
use serde::{Deserialize, Serialize};

/// Default system-wide airflow budget, as a sum of damper percentages.
pub const DEFAULT_MAX_TOTAL_DAMPER: f64 = 180.0;

/// Damper settings are published with one decimal place.
const SETTING_DECIMALS: u32 = 1;

/// Stateless arbitration of zone damper demands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamperCoordinator {
    /// Maximum sum of damper openings the fan can serve.
    pub max_total: f64,
}

impl DamperCoordinator {
    pub fn new(max_total: f64) -> ControlResult<Self> {
        ensure_finite(max_total, "max_total_damper")?;
        if max_total <= 0.0 {
            return Err(ControlError::InvalidArg {
                what: "max_total_damper must be positive",
            });
        }
        Ok(Self { max_total })
    }

    /// Turn raw demands into budget-respecting settings.
    pub fn coordinate(&self, demands: &ZoneMap<f64>) -> Coordination {
        let total = demands.sum();
        let scale = if total <= self.max_total {
            1.0
        } else {
            self.max_total / total
        };

        Coordination {
            settings: demands.map(|_, d| round_to(d * scale, SETTING_DECIMALS)),
            scale,
        }
    }
}

impl Default for DamperCoordinator {
    fn default() -> Self {
        Self {
            max_total: DEFAULT_MAX_TOTAL_DAMPER,
        }
    }
}

/// Outcome of one coordination step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordination {
    /// Damper settings actually applied (%).
    pub settings: ZoneMap<f64>,
    /// Factor applied to every demand; 1.0 when the budget was not exceeded.
    pub scale: f64,
}

impl Coordination {
    pub fn is_scaled(&self) -> bool {
        self.scale < 1.0
    }

    pub fn total(&self) -> f64 {
        self.settings.sum()
    }
}
