use cz_results::CycleSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingConfig,
    BuildingRuntime,
    Running,
    SavingResults,
    Completed,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    /// The cycle that just completed, for `RunStage::Running` events.
    pub snapshot: Option<CycleSnapshot>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            snapshot: None,
        }
    }

    pub fn cycle(elapsed_wall_s: f64, snapshot: CycleSnapshot) -> Self {
        Self {
            stage: RunStage::Running,
            elapsed_wall_s,
            message: None,
            snapshot: Some(snapshot),
        }
    }
}
