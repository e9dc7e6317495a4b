//! Run execution and history service.
//!
//! A run owns one control loop from start to stop. Whatever ends it, the
//! history of completed cycles is written to the run store exactly once.

use std::path::{Path, PathBuf};
use std::time::Instant;

use cz_plant::{ReplaySource, TemperatureSource};
use cz_project::ControllerConfig;
use cz_results::{
    CycleSnapshot, LiveFeed, RunManifest, RunStore, SourceKind, StopReason, compute_run_id,
    timestamp_now,
};
use tracing::{error, info, warn};

use crate::control_loop::{ControlLoop, LoopOptions};
use crate::error::AppResult;
use crate::progress::{RunProgressEvent, RunStage};
use crate::runtime;
use crate::stop::StopHandle;

/// Where a run's temperatures come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRequest {
    /// The configured synthetic sensor, optionally with a different seed.
    Synthetic { seed: Option<u64> },
    /// Temperatures recorded by an earlier run in the same store.
    Replay { run_id: String },
}

/// Options for running the controller.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub max_cycles: Option<u64>,
    pub pacing: bool,
    /// File rewritten with the latest snapshot after every cycle.
    pub live_path: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_cycles: None,
            pacing: true,
            live_path: None,
        }
    }
}

/// Request to execute a run from a configuration file.
pub struct RunRequest<'a> {
    pub config_path: &'a Path,
    /// Run store root; defaults to `.coldzone/runs` next to the config.
    pub runs_dir: Option<&'a Path>,
    /// Overrides the configured control period (seconds).
    pub period_s: Option<f64>,
    pub source: SourceRequest,
    pub options: RunOptions,
}

/// Response from a completed run.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    event: RunProgressEvent,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(event);
    }
}

/// Open the run store a request points at.
pub fn open_store(config_path: &Path, runs_dir: Option<&Path>) -> AppResult<RunStore> {
    Ok(match runs_dir {
        Some(dir) => RunStore::new(dir.to_path_buf())?,
        None => RunStore::for_config(config_path)?,
    })
}

/// Load a configuration file, build its source, and run it to completion.
pub fn run_with_progress(
    request: &RunRequest,
    stop: &StopHandle,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    emit_progress(
        &mut progress_cb,
        RunProgressEvent::stage(
            RunStage::LoadingConfig,
            0.0,
            Some(format!("Loading {}", request.config_path.display())),
        ),
    );

    let mut config = cz_project::load(request.config_path)?;
    if let Some(period_s) = request.period_s {
        config.control_period_s = period_s;
    }
    let store = open_store(request.config_path, request.runs_dir)?;

    emit_progress(
        &mut progress_cb,
        RunProgressEvent::stage(
            RunStage::BuildingRuntime,
            started.elapsed().as_secs_f64(),
            None,
        ),
    );

    match &request.source {
        SourceRequest::Synthetic { seed } => {
            let seed = seed.or(config.sensor.seed);
            let sensor = runtime::build_sensor(&config, seed)?;
            execute_run(
                &config,
                sensor,
                SourceKind::Synthetic { seed },
                &store,
                &request.options,
                stop,
                progress_cb,
            )
        }
        SourceRequest::Replay { run_id } => {
            let source = replay_source(&store, run_id)?;
            let recorded = source.len() as u64;
            let mut options = request.options.clone();
            options.max_cycles = Some(options.max_cycles.map_or(recorded, |m| m.min(recorded)));
            execute_run(
                &config,
                source,
                SourceKind::Replay {
                    from_run: run_id.clone(),
                },
                &store,
                &options,
                stop,
                progress_cb,
            )
        }
    }
}

/// Run `config` against any temperature source and persist the result.
///
/// A source failure ends the run: completed cycles are still saved with
/// `StopReason::SourceFailure`, then the failure is returned.
pub fn execute_run<S: TemperatureSource>(
    config: &ControllerConfig,
    source: S,
    source_kind: SourceKind,
    store: &RunStore,
    options: &RunOptions,
    stop: &StopHandle,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let runtime = runtime::build_runtime(config)?;
    let control_period_s = runtime.sample.dt;

    let started_at = timestamp_now();
    let run_id = compute_run_id(config, &started_at);
    info!(%run_id, facility = %config.name, control_period_s, "starting control run");

    let live = options.live_path.clone().map(LiveFeed::new);
    let mut control = ControlLoop::new(runtime, source);
    let loop_options = LoopOptions {
        max_cycles: options.max_cycles,
        pacing: options.pacing,
    };

    let outcome = control.run(stop, loop_options, |snapshot: &CycleSnapshot| {
        if let Some(live) = &live
            && let Err(e) = live.publish(snapshot)
        {
            warn!(
                cycle = snapshot.cycle,
                path = %live.path().display(),
                error = %e,
                "failed to write live snapshot"
            );
        }
        emit_progress(
            &mut progress_cb,
            RunProgressEvent::cycle(started.elapsed().as_secs_f64(), snapshot.clone()),
        );
    });

    let stop_reason = match &outcome {
        Ok(reason) => reason.clone(),
        Err(e) => {
            error!(
                %run_id,
                cycle = control.cycles_completed() + 1,
                error = %e,
                "temperature source failed"
            );
            StopReason::SourceFailure {
                message: e.to_string(),
            }
        }
    };
    let history = control.finish();

    emit_progress(
        &mut progress_cb,
        RunProgressEvent::stage(
            RunStage::SavingResults,
            started.elapsed().as_secs_f64(),
            Some(format!("Saving {} cycles", history.len())),
        ),
    );

    let manifest = RunManifest {
        run_id: run_id.clone(),
        facility: config.name.clone(),
        started_at,
        finished_at: timestamp_now(),
        control_period_s,
        cycles: history.len() as u64,
        source: source_kind,
        stop_reason,
        controller_version: env!("CARGO_PKG_VERSION").to_string(),
    };
    store.save_run(&manifest, &history)?;
    info!(
        %run_id,
        cycles = manifest.cycles,
        stop_reason = ?manifest.stop_reason,
        "control run stopped"
    );

    outcome?;

    emit_progress(
        &mut progress_cb,
        RunProgressEvent::stage(
            RunStage::Completed,
            started.elapsed().as_secs_f64(),
            None,
        ),
    );

    Ok(RunResponse { run_id, manifest })
}

/// Build a source that replays the zone temperatures of a stored run.
pub fn replay_source(store: &RunStore, run_id: &str) -> AppResult<ReplaySource> {
    let history = store.load_history(run_id)?;
    let frames = history
        .iter()
        .map(|s| s.zones.map(|_, z| z.temperature))
        .collect();
    Ok(ReplaySource::new(frames))
}

/// Load a run's manifest and history.
pub fn load_run(store: &RunStore, run_id: &str) -> AppResult<(RunManifest, Vec<CycleSnapshot>)> {
    let manifest = store.load_manifest(run_id)?;
    let history = store.load_history(run_id)?;
    Ok((manifest, history))
}

/// List all runs in a store, oldest first.
pub fn list_runs(store: &RunStore) -> AppResult<Vec<RunManifest>> {
    Ok(store.list_runs()?)
}
