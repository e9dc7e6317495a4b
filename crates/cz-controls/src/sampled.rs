//! Fixed-period sampling for the control cycle.
//!
//! Every zone is sampled at the same control period. The clock works on
//! elapsed seconds since the loop started so the pacing logic is testable
//! without a wall clock; the driving loop converts `Instant`s to seconds.

use crate::error::{ControlError, ControlResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Sample configuration for the control cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleConfig {
    /// Sample period in seconds.
    pub dt: f64,
}

impl SampleConfig {
    /// Create a new sample configuration.
    ///
    /// # Arguments
    ///
    /// * `dt` - Sample period in seconds (must be positive and finite)
    pub fn new(dt: f64) -> ControlResult<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ControlError::InvalidArg {
                what: "control period must be positive",
            });
        }
        Ok(Self { dt })
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs_f64(self.dt)
    }
}

/// Tracks when the next control cycle is due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleClock {
    /// Sample configuration.
    pub config: SampleConfig,
    /// Time of next scheduled sample.
    pub next_sample_time: f64,
}

impl SampleClock {
    /// Create a new sample clock.
    ///
    /// # Arguments
    ///
    /// * `config` - Sample configuration
    /// * `initial_time` - Time of the first cycle
    pub fn new(config: SampleConfig, initial_time: f64) -> Self {
        Self {
            config,
            next_sample_time: initial_time + config.dt,
        }
    }

    /// Check if a sample should occur at the given time.
    pub fn should_sample(&self, current_time: f64) -> bool {
        current_time >= self.next_sample_time
    }

    /// Advance to the next sample time.
    ///
    /// If the cycle overran by more than a whole period, the schedule is
    /// re-anchored at `current_time` instead of bursting to catch up.
    pub fn advance(&mut self, current_time: f64) {
        self.next_sample_time += self.config.dt;
        if self.next_sample_time <= current_time {
            self.reset(current_time);
        }
    }

    /// Reset the clock to a new time.
    pub fn reset(&mut self, current_time: f64) {
        self.next_sample_time = current_time + self.config.dt;
    }

    /// Get the time until the next sample.
    pub fn time_until_sample(&self, current_time: f64) -> f64 {
        (self.next_sample_time - current_time).max(0.0)
    }

    /// Remaining wait as a `Duration`, for the pacing sleep.
    pub fn wait(&self, current_time: f64) -> Duration {
        Duration::from_secs_f64(self.time_until_sample(current_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_creation() {
        let config = SampleConfig::new(0.5).unwrap();
        assert_eq!(config.dt, 0.5);
        assert_eq!(config.as_duration(), Duration::from_millis(500));
    }

    #[test]
    fn sample_config_rejects_non_positive() {
        assert!(SampleConfig::new(0.0).is_err());
        assert!(SampleConfig::new(-0.5).is_err());
        assert!(SampleConfig::new(f64::NAN).is_err());
    }

    #[test]
    fn sample_clock_basic() {
        let config = SampleConfig::new(0.5).unwrap();
        let mut clock = SampleClock::new(config, 0.0);

        assert!(!clock.should_sample(0.0));
        assert!(clock.should_sample(0.5));

        clock.advance(0.5);
        assert!(!clock.should_sample(0.5));
        assert!(clock.should_sample(1.0));
    }

    #[test]
    fn sample_clock_time_until_sample() {
        let config = SampleConfig::new(0.5).unwrap();
        let clock = SampleClock::new(config, 0.0);

        assert!((clock.time_until_sample(0.0) - 0.5).abs() < 1e-10);
        assert!((clock.time_until_sample(0.2) - 0.3).abs() < 1e-10);
        assert_eq!(clock.time_until_sample(0.7), 0.0);
        assert_eq!(clock.wait(0.7), Duration::ZERO);
    }

    #[test]
    fn overrun_reanchors_schedule() {
        let config = SampleConfig::new(0.5).unwrap();
        let mut clock = SampleClock::new(config, 0.0);

        // The first cycle took 1.7 s instead of 0.5 s.
        clock.advance(1.7);
        assert!((clock.next_sample_time - 2.2).abs() < 1e-10);
    }
}
