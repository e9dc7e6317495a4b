//! Zone-level PID controllers.
//!
//! Each zone is controlled independently. A controller converts the zone's
//! temperature error (`temperature - setpoint`, positive when the zone is too
//! warm) into a damper-opening demand in percent.
//!
//! Controllers include:
//! - A deadband inside which no action is taken and no state changes
//! - One-sided anti-windup (integral clamped to `[0, integral_limit]`)
//! - A minimum controllable flow floor whenever cooling is requested
//! - Cooling-only output: zero demand at or below setpoint

use crate::error::{ControlError, ControlResult};
use cz_core::{Zone, ZoneMap, ensure_finite};
use serde::{Deserialize, Serialize};

/// Proportional, integral and derivative gains for one zone.
///
/// Gains are per control cycle: the integral accumulates raw error once per
/// cycle and the derivative is the error difference between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl PidGains {
    pub fn new(kp: f64, ki: f64, kd: f64) -> ControlResult<Self> {
        ensure_finite(kp, "kp")?;
        ensure_finite(ki, "ki")?;
        ensure_finite(kd, "kd")?;
        if kp < 0.0 || ki < 0.0 || kd < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "gains must be non-negative",
            });
        }
        Ok(Self { kp, ki, kd })
    }
}

/// Limits shared by every zone controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    /// Half-width of the no-action band around the setpoint (°C).
    pub deadband: f64,
    /// Upper bound of the integral accumulator.
    pub integral_limit: f64,
    /// Minimum controllable flow (%) whenever cooling is requested.
    pub min_damper: f64,
    /// Fully open damper (%).
    pub max_damper: f64,
}

impl ControlLimits {
    pub const DEFAULT_DEADBAND: f64 = 0.4;
    pub const DEFAULT_INTEGRAL_LIMIT: f64 = 30.0;
    pub const DEFAULT_MIN_DAMPER: f64 = 10.0;
    pub const DEFAULT_MAX_DAMPER: f64 = 100.0;

    pub fn validate(&self) -> ControlResult<()> {
        ensure_finite(self.deadband, "deadband")?;
        ensure_finite(self.integral_limit, "integral_limit")?;
        ensure_finite(self.min_damper, "min_damper")?;
        ensure_finite(self.max_damper, "max_damper")?;
        if self.deadband < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "deadband must be non-negative",
            });
        }
        if self.integral_limit < 0.0 {
            return Err(ControlError::InvalidArg {
                what: "integral_limit must be non-negative",
            });
        }
        if self.min_damper < 0.0 || self.min_damper >= self.max_damper || self.max_damper > 100.0 {
            return Err(ControlError::InvalidArg {
                what: "damper limits must satisfy 0 <= min < max <= 100",
            });
        }
        Ok(())
    }
}

impl Default for ControlLimits {
    fn default() -> Self {
        Self {
            deadband: Self::DEFAULT_DEADBAND,
            integral_limit: Self::DEFAULT_INTEGRAL_LIMIT,
            min_damper: Self::DEFAULT_MIN_DAMPER,
            max_damper: Self::DEFAULT_MAX_DAMPER,
        }
    }
}

/// Persistent per-zone controller memory.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneControllerState {
    /// Accumulated error, always within `[0, integral_limit]`.
    pub integral: f64,
    /// Error seen on the last cycle that was outside the deadband.
    pub prev_error: f64,
}

/// Independent PID controller for a single zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZonePidController {
    zone: Zone,
    setpoint: f64,
    gains: PidGains,
    limits: ControlLimits,
    state: ZoneControllerState,
}

impl ZonePidController {
    pub fn new(zone: Zone, setpoint: f64, gains: PidGains, limits: ControlLimits) -> Self {
        Self {
            zone,
            setpoint,
            gains,
            limits,
            state: ZoneControllerState::default(),
        }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    pub fn limits(&self) -> ControlLimits {
        self.limits
    }

    pub fn state(&self) -> ZoneControllerState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = ZoneControllerState::default();
    }

    /// Compute this cycle's damper demand (%) for the measured temperature.
    ///
    /// Inside the deadband the state is left untouched, including
    /// `prev_error`. The first cycle after leaving the deadband therefore
    /// differentiates against the last error seen before entering it.
    pub fn request(&mut self, temperature: f64) -> f64 {
        let error = temperature - self.setpoint;

        if error.abs() < self.limits.deadband {
            return 0.0;
        }

        let integral = (self.state.integral + error).clamp(0.0, self.limits.integral_limit);
        let derivative = error - self.state.prev_error;
        self.state = ZoneControllerState {
            integral,
            prev_error: error,
        };

        let output = self.gains.kp * error + self.gains.ki * integral + self.gains.kd * derivative;

        if error > 0.0 {
            output.clamp(self.limits.min_damper, self.limits.max_damper)
        } else {
            // Cooling only: a zone at or below setpoint never opens its damper.
            0.0
        }
    }
}

/// One controller per zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZonePidBank {
    controllers: ZoneMap<ZonePidController>,
}

impl ZonePidBank {
    pub fn new(setpoints: &ZoneMap<f64>, gains: &ZoneMap<PidGains>, limits: ControlLimits) -> Self {
        Self {
            controllers: ZoneMap::from_fn(|z| {
                ZonePidController::new(z, setpoints[z], gains[z], limits)
            }),
        }
    }

    pub fn controller(&self, zone: Zone) -> &ZonePidController {
        &self.controllers[zone]
    }

    pub fn setpoints(&self) -> ZoneMap<f64> {
        self.controllers.map(|_, c| c.setpoint())
    }

    pub fn states(&self) -> ZoneMap<ZoneControllerState> {
        self.controllers.map(|_, c| c.state())
    }

    /// Raw, budget-unconstrained demands for every zone.
    pub fn request_all(&mut self, temperatures: &ZoneMap<f64>) -> ZoneMap<f64> {
        ZoneMap::from_fn(|z| self.controllers[z].request(temperatures[z]))
    }
}
