//! The control cycle orchestrator.
//!
//! One cycle: read temperatures, compute per-zone demands, coordinate them
//! against the airflow budget, apply the plant response, compute fan power,
//! and record a snapshot. Coordination always completes before any zone's
//! plant state is updated.
//!
//! Stop requests are only honored between cycles; a cycle in progress always
//! runs to completion.

use std::time::Instant;

use cz_controls::{SampleClock, ZonePidBank};
use cz_core::{ZoneMap, round_to};
use cz_plant::{TemperatureSource, ThermalPlantModel, require_all_zones};
use cz_results::{CycleSnapshot, StopReason, ZoneSnapshot};
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::runtime::ControlRuntime;
use crate::stop::StopHandle;

/// Snapshot temperatures are reported with two decimal places.
const TEMPERATURE_DECIMALS: u32 = 2;

/// How `ControlLoop::run` drives its cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoopOptions {
    /// End the run as if stopped once this many cycles have completed.
    pub max_cycles: Option<u64>,
    /// Wait out the control period between cycles. Off for batch runs.
    pub pacing: bool,
}

pub struct ControlLoop<S> {
    runtime: ControlRuntime,
    source: S,
    next_cycle: u64,
    history: Vec<CycleSnapshot>,
}

impl<S: TemperatureSource> ControlLoop<S> {
    pub fn new(runtime: ControlRuntime, source: S) -> Self {
        Self {
            runtime,
            source,
            next_cycle: 1,
            history: Vec::new(),
        }
    }

    /// Number of completed cycles.
    pub fn cycles_completed(&self) -> u64 {
        self.next_cycle - 1
    }

    pub fn history(&self) -> &[CycleSnapshot] {
        &self.history
    }

    pub fn plant(&self) -> &ThermalPlantModel {
        &self.runtime.plant
    }

    pub fn bank(&self) -> &ZonePidBank {
        &self.runtime.bank
    }

    /// Run exactly one control cycle, without pacing.
    ///
    /// A source failure aborts the cycle before any controller or plant state
    /// changes; the cycle counter does not advance.
    pub fn step(&mut self) -> AppResult<CycleSnapshot> {
        let cycle = self.next_cycle;
        let readings = self.source.read_temperatures(cycle)?;
        let temperatures = require_all_zones(cycle, readings)?;

        let runtime = &mut self.runtime;
        runtime.plant.observe(&temperatures);
        let demands = runtime.bank.request_all(&temperatures);

        let coordination = runtime.coordinator.coordinate(&demands);
        if coordination.is_scaled() {
            warn!(
                cycle,
                demand = demands.sum(),
                budget = runtime.coordinator.max_total,
                scale = coordination.scale,
                "airflow demand exceeds budget, scaling dampers"
            );
        }

        runtime.plant.apply_all(&coordination.settings);
        let fan_power_kw = runtime.fan.power_kw(&coordination.settings);
        let energy_savings_percent = runtime.fan.savings_percent(fan_power_kw);

        let setpoints = runtime.bank.setpoints();
        let zones = ZoneMap::from_fn(|zone| ZoneSnapshot {
            temperature: round_to(runtime.plant.temperature(zone), TEMPERATURE_DECIMALS),
            setpoint: setpoints[zone],
            damper: coordination.settings[zone],
        });

        let snapshot = CycleSnapshot {
            cycle,
            zones,
            fan_power_kw,
            energy_savings_percent,
        };
        debug!(
            cycle,
            fan_power_kw,
            dampers = %coordination.settings,
            "control cycle complete"
        );

        self.history.push(snapshot.clone());
        self.next_cycle += 1;
        Ok(snapshot)
    }

    /// Drive cycles until stopped, the cycle limit is reached, or the source
    /// fails.
    ///
    /// `on_cycle` sees every completed snapshot. Completed cycles stay in the
    /// history whatever the outcome; collect them with [`Self::finish`].
    pub fn run(
        &mut self,
        stop: &StopHandle,
        options: LoopOptions,
        mut on_cycle: impl FnMut(&CycleSnapshot),
    ) -> AppResult<StopReason> {
        let started = Instant::now();
        let mut clock = SampleClock::new(self.runtime.sample, 0.0);

        loop {
            if stop.is_stopped() {
                return Ok(StopReason::Interrupted);
            }
            if let Some(max_cycles) = options.max_cycles
                && self.cycles_completed() >= max_cycles
            {
                return Ok(StopReason::CycleLimit { max_cycles });
            }

            let snapshot = self.step()?;
            on_cycle(&snapshot);

            if options.pacing {
                let now = started.elapsed().as_secs_f64();
                if !clock.should_sample(now) {
                    std::thread::sleep(clock.wait(now));
                }
                clock.advance(started.elapsed().as_secs_f64());
            }
        }
    }

    /// Stop the loop for good and hand over its history.
    pub fn finish(self) -> Vec<CycleSnapshot> {
        self.history
    }
}
