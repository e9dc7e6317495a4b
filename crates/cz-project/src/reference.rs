//! The reference facility: constants the controller ships tuned for.

use crate::schema::{
    ControllerConfig, FanDef, GainsDef, LimitsDef, PlantDef, SensorDef, SensorZoneDef, ZoneDef,
};
use cz_core::Zone;

pub const MAX_TOTAL_DAMPER: f64 = 180.0;
pub const MIN_DAMPER: f64 = 10.0;
pub const MAX_DAMPER: f64 = 100.0;
pub const DEADBAND_C: f64 = 0.4;
pub const INTEGRAL_LIMIT: f64 = 30.0;
pub const MAX_COOLING_C: f64 = 2.5;
pub const CONTROL_PERIOD_S: f64 = 0.5;
pub const FAN_IDLE_POWER_KW: f64 = 2.0;
pub const FAN_RATED_POWER_KW: f64 = 9.0;
pub const SENSOR_NOISE_C: f64 = 0.3;

pub fn control_period_s() -> f64 {
    CONTROL_PERIOD_S
}

pub fn sensor_noise_c() -> f64 {
    SENSOR_NOISE_C
}

pub fn zone(zone: Zone) -> ZoneDef {
    let (setpoint_c, initial_temperature_c, (kp, ki, kd)) = match zone {
        Zone::Freezer => (-18.0, -16.5, (10.0, 0.12, 2.0)),
        Zone::Cooler => (3.0, 5.5, (8.0, 0.10, 1.8)),
        Zone::Packing => (16.5, 19.0, (6.0, 0.08, 1.5)),
    };
    ZoneDef {
        zone,
        setpoint_c,
        initial_temperature_c,
        gains: GainsDef { kp, ki, kd },
    }
}

pub fn sensor_zones() -> Vec<SensorZoneDef> {
    Zone::ALL
        .into_iter()
        .map(|zone| {
            let (ambient_c, thermal_mass) = match zone {
                Zone::Freezer => (-10.0, 0.98),
                Zone::Cooler => (10.0, 0.96),
                Zone::Packing => (25.0, 0.94),
            };
            SensorZoneDef {
                zone,
                ambient_c,
                thermal_mass,
                initial_temperature_c: None,
            }
        })
        .collect()
}

impl ControllerConfig {
    /// Three-zone cold store: Freezer -18 °C, Cooler 3 °C, Packing 16.5 °C.
    pub fn reference() -> Self {
        Self {
            version: crate::LATEST_VERSION,
            name: "Reference cold store".to_string(),
            control_period_s: CONTROL_PERIOD_S,
            limits: LimitsDef::default(),
            plant: PlantDef::default(),
            fan: FanDef::default(),
            zones: Zone::ALL.into_iter().map(zone).collect(),
            sensor: SensorDef::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_config_is_valid() {
        crate::validate_config(&ControllerConfig::reference()).unwrap();
    }

    #[test]
    fn reference_zone_table_is_complete() {
        let config = ControllerConfig::reference();
        let table = config.zone_table().unwrap();
        assert_eq!(table[Zone::Freezer].setpoint_c, -18.0);
        assert_eq!(table[Zone::Cooler].gains.kp, 8.0);
        assert_eq!(table[Zone::Packing].initial_temperature_c, 19.0);
    }
}
