//! Controller configuration schema.
//!
//! Everything here is fixed at startup; the control loop never reloads it.

use crate::reference;
use crate::validate::ValidationError;
use cz_core::{Zone, ZoneMap};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControllerConfig {
    pub version: u32,
    pub name: String,
    /// Fixed control period shared by every zone (seconds).
    #[serde(default = "reference::control_period_s")]
    pub control_period_s: f64,
    #[serde(default)]
    pub limits: LimitsDef,
    #[serde(default)]
    pub plant: PlantDef,
    #[serde(default)]
    pub fan: FanDef,
    pub zones: Vec<ZoneDef>,
    #[serde(default)]
    pub sensor: SensorDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LimitsDef {
    pub max_total_damper: f64,
    pub min_damper: f64,
    pub max_damper: f64,
    pub deadband_c: f64,
    pub integral_limit: f64,
}

impl Default for LimitsDef {
    fn default() -> Self {
        Self {
            max_total_damper: reference::MAX_TOTAL_DAMPER,
            min_damper: reference::MIN_DAMPER,
            max_damper: reference::MAX_DAMPER,
            deadband_c: reference::DEADBAND_C,
            integral_limit: reference::INTEGRAL_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PlantDef {
    /// Temperature drop per cycle at 100% damper (°C).
    pub max_cooling_c: f64,
}

impl Default for PlantDef {
    fn default() -> Self {
        Self {
            max_cooling_c: reference::MAX_COOLING_C,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FanDef {
    pub idle_power_kw: f64,
    pub rated_power_kw: f64,
}

impl Default for FanDef {
    fn default() -> Self {
        Self {
            idle_power_kw: reference::FAN_IDLE_POWER_KW,
            rated_power_kw: reference::FAN_RATED_POWER_KW,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GainsDef {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoneDef {
    pub zone: Zone,
    pub setpoint_c: f64,
    /// Plant temperature before the first reading arrives.
    pub initial_temperature_c: f64,
    pub gains: GainsDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorDef {
    /// Fixed seed for reproducible synthetic readings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "reference::sensor_noise_c")]
    pub noise_c: f64,
    #[serde(default = "reference::sensor_zones")]
    pub zones: Vec<SensorZoneDef>,
}

impl Default for SensorDef {
    fn default() -> Self {
        Self {
            seed: None,
            noise_c: reference::sensor_noise_c(),
            zones: reference::sensor_zones(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SensorZoneDef {
    pub zone: Zone,
    pub ambient_c: f64,
    pub thermal_mass: f64,
    /// Starting temperature of the simulated zone; defaults to the zone's
    /// plant initial temperature.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_temperature_c: Option<f64>,
}

impl ControllerConfig {
    pub fn zone(&self, zone: Zone) -> Option<&ZoneDef> {
        self.zones.iter().find(|z| z.zone == zone)
    }

    /// Per-zone definitions, one per zone of the facility.
    pub fn zone_table(&self) -> Result<ZoneMap<&ZoneDef>, ValidationError> {
        ZoneMap::try_from_fn(|zone| {
            self.zone(zone).ok_or(ValidationError::MissingZone {
                zone,
                context: "zones".to_string(),
            })
        })
    }

    pub fn sensor_table(&self) -> Result<ZoneMap<&SensorZoneDef>, ValidationError> {
        ZoneMap::try_from_fn(|zone| {
            self.sensor
                .zones
                .iter()
                .find(|s| s.zone == zone)
                .ok_or(ValidationError::MissingZone {
                    zone,
                    context: "sensor.zones".to_string(),
                })
        })
    }
}
