//! Zone thermal response to applied cooling.
//!
//! Linear damper-to-cooling model: a fully open damper removes `max_cooling`
//! degrees from the zone per control cycle. Each zone cannot be pulled below
//! its physical floor (see [`Zone::physical_floor_c`]). There is no upper
//! clamp here; warm drift is bounded by the temperature source.

use crate::error::{PlantError, PlantResult};
use cz_core::{TempInterval, Zone, ZoneMap, as_delta_c, delta_c, ensure_finite};

/// Default per-cycle temperature drop at 100% damper (°C).
pub const DEFAULT_MAX_COOLING_C: f64 = 2.5;

/// Zone temperatures and the cooling they receive.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalPlantModel {
    temperatures: ZoneMap<f64>,
    max_cooling: TempInterval,
}

impl ThermalPlantModel {
    pub fn new(initial_c: ZoneMap<f64>, max_cooling_c: f64) -> PlantResult<Self> {
        ensure_finite(max_cooling_c, "max_cooling")?;
        if max_cooling_c <= 0.0 {
            return Err(PlantError::InvalidArg {
                what: "max_cooling must be positive",
            });
        }
        for t in initial_c.values() {
            ensure_finite(*t, "initial temperature")?;
        }
        Ok(Self {
            temperatures: initial_c,
            max_cooling: delta_c(max_cooling_c),
        })
    }

    pub fn max_cooling_c(&self) -> f64 {
        as_delta_c(self.max_cooling)
    }

    pub fn temperature(&self, zone: Zone) -> f64 {
        self.temperatures[zone]
    }

    pub fn temperatures(&self) -> &ZoneMap<f64> {
        &self.temperatures
    }

    /// Overwrite every zone with a fresh measurement.
    pub fn observe(&mut self, readings: &ZoneMap<f64>) {
        self.temperatures = *readings;
    }

    /// Apply one cycle of cooling at `damper_percent` and return the new temperature.
    pub fn apply_cooling(&mut self, zone: Zone, damper_percent: f64) -> f64 {
        let cooling = (damper_percent / 100.0) * self.max_cooling_c();
        let t = &mut self.temperatures[zone];
        *t = (*t - cooling).max(zone.physical_floor_c());
        *t
    }

    pub fn apply_all(&mut self, settings: &ZoneMap<f64>) {
        for (zone, damper) in settings.iter() {
            self.apply_cooling(zone, *damper);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reference_plant() -> ThermalPlantModel {
        let initial = ZoneMap::from_fn(|z| match z {
            Zone::Freezer => -16.5,
            Zone::Cooler => 5.5,
            Zone::Packing => 19.0,
        });
        ThermalPlantModel::new(initial, DEFAULT_MAX_COOLING_C).unwrap()
    }

    #[test]
    fn cooling_is_linear_in_damper_opening() {
        let mut plant = reference_plant();
        let t = plant.apply_cooling(Zone::Freezer, 18.18);
        // 18.18/100 * 2.5 = 0.4545
        assert!((t - (-16.9545)).abs() < 1e-9);
        assert_eq!(plant.temperature(Zone::Freezer), t);
    }

    #[test]
    fn closed_damper_leaves_temperature_unchanged() {
        let mut plant = reference_plant();
        plant.apply_cooling(Zone::Cooler, 0.0);
        assert_eq!(plant.temperature(Zone::Cooler), 5.5);
    }

    #[test]
    fn floor_is_enforced_per_zone() {
        let mut plant = reference_plant();
        plant.observe(&ZoneMap::from_fn(|z| z.physical_floor_c() + 1.0));
        plant.apply_all(&ZoneMap::from_fn(|_| 100.0));
        for zone in Zone::ALL {
            assert_eq!(plant.temperature(zone), zone.physical_floor_c());
        }
    }

    #[test]
    fn observe_overwrites_all_zones() {
        let mut plant = reference_plant();
        let readings = ZoneMap::from_fn(|z| z.index() as f64);
        plant.observe(&readings);
        assert_eq!(plant.temperatures(), &readings);
    }

    #[test]
    fn invalid_parameters() {
        let initial = ZoneMap::from_fn(|_| 0.0);
        assert!(ThermalPlantModel::new(initial, 0.0).is_err());
        assert!(ThermalPlantModel::new(ZoneMap::from_fn(|_| f64::NAN), 2.5).is_err());
    }

    proptest! {
        #[test]
        fn repeated_cooling_never_breaks_floor(
            dampers in prop::collection::vec(0.0_f64..=100.0, 1..300)
        ) {
            let mut plant = reference_plant();
            for (i, d) in dampers.into_iter().enumerate() {
                let zone = Zone::ALL[i % Zone::COUNT];
                let t = plant.apply_cooling(zone, d);
                prop_assert!(t >= zone.physical_floor_c());
            }
        }
    }
}
