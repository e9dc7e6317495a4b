//! Query helpers for extracting data from stored run histories.

use std::str::FromStr;

use cz_core::{Zone, ZoneMap, round_to};
use cz_results::CycleSnapshot;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Temperature statistics of one zone over a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoneStats {
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub mean_temperature: f64,
    pub mean_damper: f64,
}

/// Summary of a run's cycles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub cycle_range: (u64, u64),
    pub cycle_count: usize,
    pub mean_fan_power_kw: f64,
    pub peak_fan_power_kw: f64,
    pub mean_energy_savings_percent: f64,
    pub zones: ZoneMap<ZoneStats>,
}

/// Get run summary from a run history.
pub fn get_run_summary(history: &[CycleSnapshot]) -> AppResult<RunSummary> {
    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        return Err(AppError::InvalidInput("No cycles in run".to_string()));
    };
    let n = history.len() as f64;

    let mean = |f: &dyn Fn(&CycleSnapshot) -> f64| {
        round_to(history.iter().map(f).sum::<f64>() / n, 2)
    };

    let zones = ZoneMap::from_fn(|zone| {
        let temps = history.iter().map(|s| s.zones[zone].temperature);
        ZoneStats {
            min_temperature: temps.clone().fold(f64::INFINITY, f64::min),
            max_temperature: temps.fold(f64::NEG_INFINITY, f64::max),
            mean_temperature: mean(&|s: &CycleSnapshot| s.zones[zone].temperature),
            mean_damper: mean(&|s: &CycleSnapshot| s.zones[zone].damper),
        }
    });

    Ok(RunSummary {
        cycle_range: (first.cycle, last.cycle),
        cycle_count: history.len(),
        mean_fan_power_kw: mean(&|s: &CycleSnapshot| s.fan_power_kw),
        peak_fan_power_kw: history
            .iter()
            .map(|s| s.fan_power_kw)
            .fold(f64::NEG_INFINITY, f64::max),
        mean_energy_savings_percent: mean(&|s: &CycleSnapshot| {
            f64::from(s.energy_savings_percent)
        }),
        zones,
    })
}

/// A quantity that can be extracted from a run as a per-cycle series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesVariable {
    Temperature,
    Damper,
    Setpoint,
    FanPower,
}

impl SeriesVariable {
    /// Per-zone variables need a zone to select.
    pub fn is_per_zone(self) -> bool {
        !matches!(self, SeriesVariable::FanPower)
    }
}

impl FromStr for SeriesVariable {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temperature" | "temp" => Ok(SeriesVariable::Temperature),
            "damper" => Ok(SeriesVariable::Damper),
            "setpoint" => Ok(SeriesVariable::Setpoint),
            "fan_power" | "fan_power_kw" => Ok(SeriesVariable::FanPower),
            _ => Err(AppError::InvalidInput(format!("Unknown variable: {}", s))),
        }
    }
}

/// Extract `(cycle, value)` pairs for a variable.
pub fn extract_series(
    history: &[CycleSnapshot],
    variable: SeriesVariable,
    zone: Option<Zone>,
) -> AppResult<Vec<(u64, f64)>> {
    let pick: Box<dyn Fn(&CycleSnapshot) -> f64> = match (variable, zone) {
        (SeriesVariable::FanPower, _) => Box::new(|s: &CycleSnapshot| s.fan_power_kw),
        (SeriesVariable::Temperature, Some(z)) => {
            Box::new(move |s: &CycleSnapshot| s.zones[z].temperature)
        }
        (SeriesVariable::Damper, Some(z)) => Box::new(move |s: &CycleSnapshot| s.zones[z].damper),
        (SeriesVariable::Setpoint, Some(z)) => {
            Box::new(move |s: &CycleSnapshot| s.zones[z].setpoint)
        }
        (_, None) => {
            return Err(AppError::InvalidInput(format!(
                "{:?} series needs a zone",
                variable
            )));
        }
    };

    Ok(history.iter().map(|s| (s.cycle, pick(s))).collect())
}
