//! Error types for the cz-app service layer.

/// Application error type that wraps errors from the backend crates and
/// gives the CLI one error to report.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Project(#[from] cz_project::ProjectError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] cz_project::ValidationError),

    #[error("Controller error: {0}")]
    Control(#[from] cz_controls::ControlError),

    #[error("Temperature source error: {0}")]
    Plant(#[from] cz_plant::PlantError),

    #[error("Results error: {0}")]
    Results(#[from] cz_results::ResultsError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Signal handler error: {0}")]
    Signal(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cz-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// True when the run ended because its temperature source failed.
    pub fn is_source_failure(&self) -> bool {
        matches!(self, AppError::Plant(_))
    }
}
