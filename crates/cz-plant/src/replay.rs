//! Replays previously recorded zone temperatures.

use crate::error::{PlantError, PlantResult};
use crate::sensor::{Readings, TemperatureSource};
use cz_core::ZoneMap;

/// Feeds recorded frames back into the control cycle, one frame per cycle.
///
/// Frames built from a stored run are that run's published zone
/// temperatures, which are taken after the cycle's cooling was applied and
/// rounded to two decimals. They are not the raw sensor readings the run saw.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    frames: Vec<ZoneMap<f64>>,
}

impl ReplaySource {
    pub fn new(frames: Vec<ZoneMap<f64>>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl TemperatureSource for ReplaySource {
    fn read_temperatures(&mut self, cycle: u64) -> PlantResult<Readings> {
        let frame = usize::try_from(cycle)
            .ok()
            .and_then(|c| c.checked_sub(1))
            .and_then(|i| self.frames.get(i))
            .ok_or(PlantError::SourceExhausted { cycle })?;
        Ok(frame.iter().map(|(z, t)| (z, *t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cz_core::Zone;

    #[test]
    fn replays_frames_by_cycle() {
        let frames = vec![ZoneMap::from_fn(|_| 1.0), ZoneMap::from_fn(|_| 2.0)];
        let mut source = ReplaySource::new(frames);
        assert_eq!(source.read_temperatures(2).unwrap()[&Zone::Packing], 2.0);
        assert_eq!(source.read_temperatures(1).unwrap()[&Zone::Freezer], 1.0);
    }

    #[test]
    fn exhausted_and_zero_cycles_fail() {
        let mut source = ReplaySource::new(vec![ZoneMap::from_fn(|_| 1.0)]);
        assert_eq!(
            source.read_temperatures(2).unwrap_err(),
            PlantError::SourceExhausted { cycle: 2 }
        );
        assert!(source.read_temperatures(0).is_err());
    }
}
