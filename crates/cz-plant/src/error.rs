//! Error types for plant and sensor operations.

use cz_core::Zone;
use thiserror::Error;

/// Errors encountered by plant models and temperature sources.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlantError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Sensor unavailable: no reading for {zone} on cycle {cycle}")]
    SensorUnavailable { zone: Zone, cycle: u64 },

    #[error("Invalid reading for {zone} on cycle {cycle}: {value}")]
    InvalidReading { zone: Zone, cycle: u64, value: f64 },

    #[error("Temperature source exhausted on cycle {cycle}")]
    SourceExhausted { cycle: u64 },
}

pub type PlantResult<T> = Result<T, PlantError>;

impl From<cz_core::CoreError> for PlantError {
    fn from(e: cz_core::CoreError) -> Self {
        match e {
            cz_core::CoreError::InvalidArg { what } | cz_core::CoreError::NonFinite { what, .. } => {
                PlantError::InvalidArg { what }
            }
            cz_core::CoreError::UnknownZone { .. } => PlantError::InvalidArg {
                what: "unknown zone",
            },
        }
    }
}
