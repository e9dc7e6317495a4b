//! Configuration validation logic.
//!
//! A configuration that fails here never starts a run.

use crate::schema::{ControllerConfig, GainsDef, LimitsDef};
use cz_core::Zone;
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing zone: {zone} in {context}")]
    MissingZone { zone: Zone, context: String },

    #[error("Duplicate zone: {zone} in {context}")]
    DuplicateZone { zone: Zone, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn finite(field: &str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid(field, value, "must be finite"))
    }
}

pub fn validate_config(config: &ControllerConfig) -> Result<(), ValidationError> {
    if config.version == 0 || config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    if finite("control_period_s", config.control_period_s)? <= 0.0 {
        return Err(invalid(
            "control_period_s",
            config.control_period_s,
            "must be positive",
        ));
    }

    validate_limits(&config.limits)?;

    if finite("plant.max_cooling_c", config.plant.max_cooling_c)? <= 0.0 {
        return Err(invalid(
            "plant.max_cooling_c",
            config.plant.max_cooling_c,
            "must be positive",
        ));
    }

    let idle = finite("fan.idle_power_kw", config.fan.idle_power_kw)?;
    let rated = finite("fan.rated_power_kw", config.fan.rated_power_kw)?;
    if idle < 0.0 {
        return Err(invalid("fan.idle_power_kw", idle, "must be non-negative"));
    }
    if rated <= idle {
        return Err(invalid(
            "fan.rated_power_kw",
            rated,
            "must exceed idle power",
        ));
    }

    let mut seen = HashSet::new();
    for zone_def in &config.zones {
        let zone = zone_def.zone;
        if !seen.insert(zone) {
            return Err(ValidationError::DuplicateZone {
                zone,
                context: "zones".to_string(),
            });
        }
        let setpoint = finite(&format!("{zone}.setpoint_c"), zone_def.setpoint_c)?;
        if setpoint < zone.physical_floor_c() {
            return Err(invalid(
                format!("{zone}.setpoint_c"),
                setpoint,
                "below the zone's physical floor",
            ));
        }
        finite(
            &format!("{zone}.initial_temperature_c"),
            zone_def.initial_temperature_c,
        )?;
        validate_gains(zone, &zone_def.gains)?;
    }
    config.zone_table()?;

    let noise = finite("sensor.noise_c", config.sensor.noise_c)?;
    if noise < 0.0 {
        return Err(invalid("sensor.noise_c", noise, "must be non-negative"));
    }
    let mut seen = HashSet::new();
    for sensor_zone in &config.sensor.zones {
        let zone = sensor_zone.zone;
        if !seen.insert(zone) {
            return Err(ValidationError::DuplicateZone {
                zone,
                context: "sensor.zones".to_string(),
            });
        }
        finite(&format!("sensor.{zone}.ambient_c"), sensor_zone.ambient_c)?;
        let mass = sensor_zone.thermal_mass;
        if !(mass > 0.0 && mass <= 1.0) {
            return Err(invalid(
                format!("sensor.{zone}.thermal_mass"),
                mass,
                "must be in (0, 1]",
            ));
        }
        if let Some(t) = sensor_zone.initial_temperature_c {
            finite(&format!("sensor.{zone}.initial_temperature_c"), t)?;
        }
    }
    config.sensor_table()?;

    Ok(())
}

fn validate_limits(limits: &LimitsDef) -> Result<(), ValidationError> {
    if finite("limits.max_total_damper", limits.max_total_damper)? <= 0.0 {
        return Err(invalid(
            "limits.max_total_damper",
            limits.max_total_damper,
            "must be positive",
        ));
    }
    let min = finite("limits.min_damper", limits.min_damper)?;
    let max = finite("limits.max_damper", limits.max_damper)?;
    if min < 0.0 {
        return Err(invalid("limits.min_damper", min, "must be non-negative"));
    }
    if max > 100.0 {
        return Err(invalid("limits.max_damper", max, "cannot exceed 100%"));
    }
    if min >= max {
        return Err(invalid(
            "limits.min_damper",
            min,
            "must be below limits.max_damper",
        ));
    }
    if finite("limits.deadband_c", limits.deadband_c)? < 0.0 {
        return Err(invalid(
            "limits.deadband_c",
            limits.deadband_c,
            "must be non-negative",
        ));
    }
    if finite("limits.integral_limit", limits.integral_limit)? < 0.0 {
        return Err(invalid(
            "limits.integral_limit",
            limits.integral_limit,
            "must be non-negative",
        ));
    }
    Ok(())
}

fn validate_gains(zone: Zone, gains: &GainsDef) -> Result<(), ValidationError> {
    for (name, value) in [("kp", gains.kp), ("ki", gains.ki), ("kd", gains.kd)] {
        let field = format!("{zone}.gains.{name}");
        if finite(&field, value)? < 0.0 {
            return Err(invalid(field, value, "must be non-negative"));
        }
    }
    Ok(())
}
