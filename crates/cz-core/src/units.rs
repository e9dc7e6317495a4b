// cz-core/src/units.rs

use uom::si::f64::{Power as UomPower, TemperatureInterval as UomTemperatureInterval};

// Public canonical unit types (SI, f64)
pub type Power = UomPower;
pub type TempInterval = UomTemperatureInterval;

#[inline]
pub fn kw(v: f64) -> Power {
    use uom::si::power::kilowatt;
    Power::new::<kilowatt>(v)
}

#[inline]
pub fn as_kw(p: Power) -> f64 {
    use uom::si::power::kilowatt;
    p.get::<kilowatt>()
}

#[inline]
pub fn delta_c(v: f64) -> TempInterval {
    use uom::si::temperature_interval::degree_celsius;
    TempInterval::new::<degree_celsius>(v)
}

#[inline]
pub fn as_delta_c(t: TempInterval) -> f64 {
    use uom::si::temperature_interval::degree_celsius;
    t.get::<degree_celsius>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _p = kw(9.0);
        let _cool = delta_c(2.5);
    }

    #[test]
    fn round_trips_through_si() {
        assert!((as_kw(kw(2.0)) - 2.0).abs() < 1e-12);
        assert!((as_delta_c(delta_c(2.5)) - 2.5).abs() < 1e-12);
    }
}
