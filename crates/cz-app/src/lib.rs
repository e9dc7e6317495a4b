//! Application service layer for the Coldzone controller.
//!
//! Builds controller and plant models from a configuration, drives the
//! control cycle, persists run history and answers queries over stored runs.
//! The CLI is a thin front end over this crate.

pub mod control_loop;
pub mod error;
pub mod progress;
pub mod query;
pub mod run_service;
pub mod runtime;
pub mod stop;

// Re-export key types for convenience
pub use control_loop::{ControlLoop, LoopOptions};
pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage};
pub use query::{RunSummary, SeriesVariable, ZoneStats, extract_series, get_run_summary};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, SourceRequest, execute_run, list_runs, load_run,
    open_store, replay_source, run_with_progress,
};
pub use runtime::{ControlRuntime, build_runtime, build_sensor};
pub use stop::StopHandle;
