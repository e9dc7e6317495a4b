//! Temperature source boundary.
//!
//! The control cycle asks its source for one reading per zone per cycle. A
//! source may be a sensor bus, a network feed, a synthetic model or a replay
//! of a recorded run; the loop only depends on this trait.

use crate::error::{PlantError, PlantResult};
use cz_core::{Zone, ZoneMap};
use std::collections::BTreeMap;

/// Raw readings as delivered by a source (°C per zone).
pub type Readings = BTreeMap<Zone, f64>;

/// Anything that can produce zone temperatures for a control cycle.
pub trait TemperatureSource {
    /// Read every zone's temperature for `cycle` (1-based).
    fn read_temperatures(&mut self, cycle: u64) -> PlantResult<Readings>;
}

impl<S: TemperatureSource + ?Sized> TemperatureSource for Box<S> {
    fn read_temperatures(&mut self, cycle: u64) -> PlantResult<Readings> {
        (**self).read_temperatures(cycle)
    }
}

/// Promote raw readings to a complete zone map.
///
/// A missing zone or a non-finite value fails the cycle. There is no
/// fallback to a previous value.
pub fn require_all_zones(cycle: u64, readings: Readings) -> PlantResult<ZoneMap<f64>> {
    let temps =
        ZoneMap::from_entries(readings).map_err(|zone| PlantError::SensorUnavailable { zone, cycle })?;
    for (zone, value) in temps.iter() {
        if !value.is_finite() {
            return Err(PlantError::InvalidReading {
                zone,
                cycle,
                value: *value,
            });
        }
    }
    Ok(temps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_readings_pass() {
        let readings: Readings = Zone::ALL.into_iter().map(|z| (z, 1.0)).collect();
        let temps = require_all_zones(4, readings).unwrap();
        assert_eq!(temps, ZoneMap::from_fn(|_| 1.0));
    }

    #[test]
    fn missing_zone_is_sensor_unavailable() {
        let mut readings = Readings::new();
        readings.insert(Zone::Freezer, -18.0);
        readings.insert(Zone::Cooler, 3.0);
        let err = require_all_zones(7, readings).unwrap_err();
        assert_eq!(
            err,
            PlantError::SensorUnavailable {
                zone: Zone::Packing,
                cycle: 7
            }
        );
    }

    #[test]
    fn nan_reading_is_rejected() {
        let mut readings: Readings = Zone::ALL.into_iter().map(|z| (z, 1.0)).collect();
        readings.insert(Zone::Cooler, f64::NAN);
        let err = require_all_zones(2, readings).unwrap_err();
        assert!(matches!(
            err,
            PlantError::InvalidReading {
                zone: Zone::Cooler,
                cycle: 2,
                ..
            }
        ));
    }
}
