//! Plant-side models for the Coldzone control cycle.
//!
//! Provides:
//! - Thermal response of each zone to coordinated damper settings
//! - Fan electrical power from the coordinated airflow (affinity law)
//! - The temperature source boundary and its synthetic and replay sources

pub mod error;
pub mod fan;
pub mod replay;
pub mod sensor;
pub mod synthetic;
pub mod thermal;

// Re-exports for public API
pub use error::{PlantError, PlantResult};
pub use fan::FanPowerModel;
pub use replay::ReplaySource;
pub use sensor::{Readings, TemperatureSource, require_all_zones};
pub use synthetic::{SensorZoneParams, SyntheticSensor, load_factor};
pub use thermal::ThermalPlantModel;
