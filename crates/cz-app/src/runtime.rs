//! Runtime construction of a `ControllerConfig` into executable models.

use cz_controls::{ControlLimits, DamperCoordinator, PidGains, SampleConfig, ZonePidBank};
use cz_core::ZoneMap;
use cz_plant::{FanPowerModel, SensorZoneParams, SyntheticSensor, ThermalPlantModel};
use cz_project::{ControllerConfig, validate_config};

use crate::error::AppResult;

/// Everything one control loop owns, built from a validated configuration.
#[derive(Debug, Clone)]
pub struct ControlRuntime {
    pub bank: ZonePidBank,
    pub coordinator: DamperCoordinator,
    pub plant: ThermalPlantModel,
    pub fan: FanPowerModel,
    pub sample: SampleConfig,
}

/// Validate `config` and compile it into controller and plant models.
pub fn build_runtime(config: &ControllerConfig) -> AppResult<ControlRuntime> {
    validate_config(config)?;
    let zones = config.zone_table()?;

    let limits = ControlLimits {
        deadband: config.limits.deadband_c,
        integral_limit: config.limits.integral_limit,
        min_damper: config.limits.min_damper,
        max_damper: config.limits.max_damper,
    };
    limits.validate()?;

    let setpoints = zones.map(|_, z| z.setpoint_c);
    let gains = ZoneMap::try_from_fn(|zone| {
        let g = zones[zone].gains;
        PidGains::new(g.kp, g.ki, g.kd)
    })?;
    let initial = zones.map(|_, z| z.initial_temperature_c);

    Ok(ControlRuntime {
        bank: ZonePidBank::new(&setpoints, &gains, limits),
        coordinator: DamperCoordinator::new(config.limits.max_total_damper)?,
        plant: ThermalPlantModel::new(initial, config.plant.max_cooling_c)?,
        fan: FanPowerModel::new(config.fan.idle_power_kw, config.fan.rated_power_kw)?,
        sample: SampleConfig::new(config.control_period_s)?,
    })
}

/// Build the synthetic temperature source described by `config.sensor`.
///
/// `seed_override` takes precedence over the configured seed. A simulated
/// zone without its own starting temperature starts where the plant does.
pub fn build_sensor(
    config: &ControllerConfig,
    seed_override: Option<u64>,
) -> AppResult<SyntheticSensor> {
    let zones = config.zone_table()?;
    let sensor_zones = config.sensor_table()?;

    let initial = sensor_zones.map(|zone, s| {
        s.initial_temperature_c
            .unwrap_or(zones[zone].initial_temperature_c)
    });
    let params = sensor_zones.map(|_, s| SensorZoneParams {
        ambient_c: s.ambient_c,
        thermal_mass: s.thermal_mass,
    });

    Ok(SyntheticSensor::new(
        initial,
        params,
        config.sensor.noise_c,
        seed_override.or(config.sensor.seed),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cz_core::Zone;
    use cz_plant::TemperatureSource;

    #[test]
    fn reference_config_builds() {
        let config = ControllerConfig::reference();
        let runtime = build_runtime(&config).unwrap();

        assert_eq!(runtime.coordinator.max_total, 180.0);
        assert_eq!(runtime.sample.dt, 0.5);
        assert_eq!(runtime.fan.rated_kw(), 9.0);
        assert_eq!(runtime.plant.temperature(Zone::Freezer), -16.5);
        assert_eq!(runtime.bank.setpoints()[Zone::Packing], 16.5);
        assert_eq!(runtime.bank.controller(Zone::Cooler).gains().kp, 8.0);
    }

    #[test]
    fn invalid_config_is_rejected_before_building() {
        let mut config = ControllerConfig::reference();
        config.limits.max_total_damper = 0.0;
        assert!(build_runtime(&config).is_err());

        let mut config = ControllerConfig::reference();
        config.zones.retain(|z| z.zone != Zone::Cooler);
        assert!(build_runtime(&config).is_err());
    }

    #[test]
    fn seed_override_wins() {
        let mut config = ControllerConfig::reference();
        config.sensor.seed = Some(1);

        let mut configured = build_sensor(&config, None).unwrap();
        let mut same = build_sensor(&config, Some(1)).unwrap();
        assert_eq!(
            configured.read_temperatures(1).unwrap(),
            same.read_temperatures(1).unwrap()
        );
    }

    #[test]
    fn sensor_starts_from_plant_when_unset() {
        let mut config = ControllerConfig::reference();
        for s in &mut config.sensor.zones {
            s.initial_temperature_c = None;
        }
        let sensor = build_sensor(&config, Some(3)).unwrap();
        assert_eq!(sensor.state()[Zone::Cooler], 5.5);
    }
}
