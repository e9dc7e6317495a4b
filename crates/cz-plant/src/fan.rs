//! Fan electrical power from coordinated airflow.
//!
//! Centrifugal and axial fans follow the affinity laws: shaft power scales
//! with the cube of flow. Flow is approximated by the mean fractional damper
//! opening across zones, so
//!
//! `P = P_idle + avg_flow³ · (P_rated - P_idle)`

use crate::error::{PlantError, PlantResult};
use cz_core::{Power, ZoneMap, as_kw, ensure_finite, kw, round_to};

pub const DEFAULT_IDLE_POWER_KW: f64 = 2.0;
pub const DEFAULT_RATED_POWER_KW: f64 = 9.0;

/// Fan power is reported with two decimal places.
const POWER_DECIMALS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanPowerModel {
    idle: Power,
    rated: Power,
}

impl FanPowerModel {
    pub fn new(idle_kw: f64, rated_kw: f64) -> PlantResult<Self> {
        ensure_finite(idle_kw, "fan idle power")?;
        ensure_finite(rated_kw, "fan rated power")?;
        if idle_kw < 0.0 || rated_kw <= idle_kw {
            return Err(PlantError::InvalidArg {
                what: "fan power must satisfy 0 <= idle < rated",
            });
        }
        Ok(Self {
            idle: kw(idle_kw),
            rated: kw(rated_kw),
        })
    }

    pub fn idle_kw(&self) -> f64 {
        as_kw(self.idle)
    }

    pub fn rated_kw(&self) -> f64 {
        as_kw(self.rated)
    }

    /// Mean fractional damper opening in [0, 1].
    pub fn average_flow(dampers: &ZoneMap<f64>) -> f64 {
        let count = dampers.values().count() as f64;
        dampers.sum() / (count * 100.0)
    }

    /// Instantaneous fan power in kW, rounded to two decimals.
    pub fn power_kw(&self, dampers: &ZoneMap<f64>) -> f64 {
        let avg_flow = Self::average_flow(dampers);
        let idle = self.idle_kw();
        let dynamic = avg_flow.powi(3) * (self.rated_kw() - idle);
        round_to(idle + dynamic, POWER_DECIMALS)
    }

    pub fn power(&self, dampers: &ZoneMap<f64>) -> Power {
        kw(self.power_kw(dampers))
    }

    /// Energy saved relative to a constant-volume system running the fan at
    /// rated power every cycle, as a whole percentage in [0, 100].
    pub fn savings_percent(&self, power_kw: f64) -> u32 {
        let fraction = 1.0 - power_kw / self.rated_kw();
        (fraction * 100.0).round().clamp(0.0, 100.0) as u32
    }
}

impl Default for FanPowerModel {
    fn default() -> Self {
        Self {
            idle: kw(DEFAULT_IDLE_POWER_KW),
            rated: kw(DEFAULT_RATED_POWER_KW),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cz_core::Zone;
    use proptest::prelude::*;

    #[test]
    fn all_closed_draws_idle_power() {
        let fan = FanPowerModel::default();
        assert!((fan.power_kw(&ZoneMap::from_fn(|_| 0.0)) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn all_open_draws_rated_power() {
        let fan = FanPowerModel::default();
        assert!((fan.power_kw(&ZoneMap::from_fn(|_| 100.0)) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn cubic_law_at_partial_flow() {
        let fan = FanPowerModel::default();
        // avg flow 0.5 -> 2 + 0.125 * 7 = 2.875 -> 2.88
        let dampers = ZoneMap::from_fn(|_| 50.0);
        assert!((fan.power_kw(&dampers) - 2.88).abs() < 1e-9);
    }

    #[test]
    fn power_is_order_independent() {
        let fan = FanPowerModel::default();
        let a = ZoneMap::from_fn(|z| match z {
            Zone::Freezer => 80.0,
            Zone::Cooler => 10.0,
            Zone::Packing => 40.0,
        });
        let b = ZoneMap::from_fn(|z| match z {
            Zone::Freezer => 10.0,
            Zone::Cooler => 40.0,
            Zone::Packing => 80.0,
        });
        assert_eq!(fan.power_kw(&a), fan.power_kw(&b));
    }

    #[test]
    fn savings_against_rated_baseline() {
        let fan = FanPowerModel::default();
        assert_eq!(fan.savings_percent(9.0), 0);
        assert_eq!(fan.savings_percent(2.0), 78);
        assert_eq!(fan.savings_percent(4.5), 50);
    }

    #[test]
    fn quantity_matches_scalar() {
        let fan = FanPowerModel::default();
        let dampers = ZoneMap::from_fn(|_| 60.0);
        assert!((as_kw(fan.power(&dampers)) - fan.power_kw(&dampers)).abs() < 1e-9);
    }

    #[test]
    fn invalid_parameters() {
        assert!(FanPowerModel::new(9.0, 2.0).is_err());
        assert!(FanPowerModel::new(-1.0, 2.0).is_err());
        assert!(FanPowerModel::new(2.0, f64::NAN).is_err());
    }

    proptest! {
        #[test]
        fn power_is_monotone_in_flow(a in 0.0_f64..=100.0, b in 0.0_f64..=100.0) {
            let fan = FanPowerModel::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let p_lo = fan.power_kw(&ZoneMap::from_fn(|_| lo));
            let p_hi = fan.power_kw(&ZoneMap::from_fn(|_| hi));
            prop_assert!(p_lo <= p_hi);
            prop_assert!((2.0..=9.0).contains(&p_lo));
        }
    }
}
