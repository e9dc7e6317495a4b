//! Synthetic temperature source.
//!
//! Stands in for a sensor bus when no hardware is attached. Each zone carries
//! its own lumped thermal state that every cycle:
//! - drifts toward ambient by `(ambient - T) * (1 - thermal_mass)`
//! - gains heat from operational load (doors, people, goods)
//! - picks up uniform measurement noise
//!
//! and is then held inside hard per-zone safety limits. The synthetic state
//! is independent of the controller's plant model: it is the "outside world"
//! the controller observes.

use crate::error::{PlantError, PlantResult};
use crate::sensor::{Readings, TemperatureSource};
use cz_core::{Zone, ZoneMap, ensure_finite, round_to};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Uniform noise half-width (°C) of the reference sensor.
pub const DEFAULT_NOISE_C: f64 = 0.3;

/// Range of the per-cycle load heat gain before the load factor (°C).
const LOAD_GAIN_RANGE: (f64, f64) = (0.3, 0.8);

/// Readings are published with two decimal places.
const READING_DECIMALS: u32 = 2;

/// Ambient coupling of one zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorZoneParams {
    /// Temperature the zone relaxes toward when uncooled (°C).
    pub ambient_c: f64,
    /// Thermal inertia in (0, 1]; larger is slower.
    pub thermal_mass: f64,
}

impl SensorZoneParams {
    pub fn reference(zone: Zone) -> Self {
        match zone {
            Zone::Freezer => Self {
                ambient_c: -10.0,
                thermal_mass: 0.98,
            },
            Zone::Cooler => Self {
                ambient_c: 10.0,
                thermal_mass: 0.96,
            },
            Zone::Packing => Self {
                ambient_c: 25.0,
                thermal_mass: 0.94,
            },
        }
    }
}

/// Operational load multiplier for a cycle: morning activity, an afternoon
/// peak, and steady operation otherwise.
pub fn load_factor(cycle: u64) -> f64 {
    match cycle {
        20..=40 => 1.2,
        60..=80 => 1.5,
        _ => 0.9,
    }
}

/// Hard safety limits of the simulated zone (°C).
fn safety_limits(zone: Zone) -> (f64, f64) {
    match zone {
        Zone::Freezer => (-30.0, 0.0),
        Zone::Cooler => (-2.0, 15.0),
        Zone::Packing => (10.0, 35.0),
    }
}

#[derive(Debug)]
pub struct SyntheticSensor {
    state: ZoneMap<f64>,
    params: ZoneMap<SensorZoneParams>,
    noise_c: f64,
    rng: StdRng,
}

impl SyntheticSensor {
    /// # Arguments
    ///
    /// * `initial_c` - Starting zone temperatures
    /// * `params` - Ambient coupling per zone
    /// * `noise_c` - Uniform noise half-width (°C)
    /// * `seed` - Fixed RNG seed for reproducible runs; entropy if `None`
    pub fn new(
        initial_c: ZoneMap<f64>,
        params: ZoneMap<SensorZoneParams>,
        noise_c: f64,
        seed: Option<u64>,
    ) -> PlantResult<Self> {
        ensure_finite(noise_c, "sensor noise")?;
        if noise_c < 0.0 {
            return Err(PlantError::InvalidArg {
                what: "sensor noise must be non-negative",
            });
        }
        for (_, p) in params.iter() {
            ensure_finite(p.ambient_c, "ambient temperature")?;
            if !(p.thermal_mass > 0.0 && p.thermal_mass <= 1.0) {
                return Err(PlantError::InvalidArg {
                    what: "thermal_mass must be in (0, 1]",
                });
            }
        }
        for t in initial_c.values() {
            ensure_finite(*t, "initial temperature")?;
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            state: initial_c,
            params,
            noise_c,
            rng,
        })
    }

    /// The reference facility: -16.5 / 5.5 / 19.0 °C start, ±0.3 °C noise.
    pub fn reference(seed: Option<u64>) -> PlantResult<Self> {
        let initial = ZoneMap::from_fn(|z| match z {
            Zone::Freezer => -16.5,
            Zone::Cooler => 5.5,
            Zone::Packing => 19.0,
        });
        Self::new(
            initial,
            ZoneMap::from_fn(SensorZoneParams::reference),
            DEFAULT_NOISE_C,
            seed,
        )
    }

    /// Unrounded internal state of the simulated zones.
    pub fn state(&self) -> &ZoneMap<f64> {
        &self.state
    }

    fn sample_zone(&mut self, zone: Zone, load: f64) -> f64 {
        let params = self.params[zone];
        let noise = self.rng.gen_range(-self.noise_c..=self.noise_c);
        let load_gain = self.rng.gen_range(LOAD_GAIN_RANGE.0..=LOAD_GAIN_RANGE.1) * load;

        let current = self.state[zone];
        let ambient_pull = (params.ambient_c - current) * (1.0 - params.thermal_mass);
        let (lo, hi) = safety_limits(zone);
        let next = (current + ambient_pull + load_gain + noise).clamp(lo, hi);

        self.state[zone] = next;
        round_to(next, READING_DECIMALS)
    }
}

impl TemperatureSource for SyntheticSensor {
    fn read_temperatures(&mut self, cycle: u64) -> PlantResult<Readings> {
        let load = load_factor(cycle);
        tracing::trace!(cycle, load, "sampling synthetic sensor");
        Ok(Zone::ALL
            .into_iter()
            .map(|zone| (zone, self.sample_zone(zone, load)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_profile_windows() {
        assert_eq!(load_factor(1), 0.9);
        assert_eq!(load_factor(20), 1.2);
        assert_eq!(load_factor(40), 1.2);
        assert_eq!(load_factor(41), 0.9);
        assert_eq!(load_factor(60), 1.5);
        assert_eq!(load_factor(80), 1.5);
        assert_eq!(load_factor(81), 0.9);
    }

    #[test]
    fn produces_every_zone() {
        let mut sensor = SyntheticSensor::reference(Some(7)).unwrap();
        let readings = sensor.read_temperatures(1).unwrap();
        assert_eq!(readings.len(), Zone::COUNT);
    }

    #[test]
    fn same_seed_same_readings() {
        let mut a = SyntheticSensor::reference(Some(42)).unwrap();
        let mut b = SyntheticSensor::reference(Some(42)).unwrap();
        for cycle in 1..=50 {
            assert_eq!(
                a.read_temperatures(cycle).unwrap(),
                b.read_temperatures(cycle).unwrap()
            );
        }
    }

    #[test]
    fn readings_stay_within_safety_limits() {
        let mut sensor = SyntheticSensor::reference(Some(3)).unwrap();
        for cycle in 1..=500 {
            for (zone, t) in sensor.read_temperatures(cycle).unwrap() {
                let (lo, hi) = safety_limits(zone);
                assert!(t >= lo && t <= hi, "{zone} reading {t} outside [{lo}, {hi}]");
            }
        }
    }

    #[test]
    fn noiseless_step_is_deterministic_within_load_band() {
        let initial = ZoneMap::from_fn(|_| 12.0);
        let params = ZoneMap::from_fn(|_| SensorZoneParams {
            ambient_c: 22.0,
            thermal_mass: 0.9,
        });
        let mut sensor = SyntheticSensor::new(initial, params, 0.0, Some(1)).unwrap();
        let readings = sensor.read_temperatures(1).unwrap();
        // 12 + (22 - 12) * 0.1 + [0.27, 0.72]
        let t = readings[&Zone::Cooler];
        assert!((13.27..=13.72).contains(&t), "{t}");
    }

    #[test]
    fn invalid_parameters() {
        let initial = ZoneMap::from_fn(|_| 0.0);
        let params = ZoneMap::from_fn(SensorZoneParams::reference);
        assert!(SyntheticSensor::new(initial, params, -0.1, None).is_err());

        let bad_mass = ZoneMap::from_fn(|_| SensorZoneParams {
            ambient_c: 0.0,
            thermal_mass: 0.0,
        });
        assert!(SyntheticSensor::new(initial, bad_mass, 0.3, None).is_err());
    }
}
