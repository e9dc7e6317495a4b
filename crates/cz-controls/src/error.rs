//! Error types for control operations.

use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur while building controllers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided to a control function.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A numeric parameter was NaN or infinite.
    #[error("Non-finite parameter {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

impl From<cz_core::CoreError> for ControlError {
    fn from(e: cz_core::CoreError) -> Self {
        match e {
            cz_core::CoreError::NonFinite { what, value } => ControlError::NonFinite { what, value },
            cz_core::CoreError::InvalidArg { what } => ControlError::InvalidArg { what },
            cz_core::CoreError::UnknownZone { .. } => ControlError::InvalidArg {
                what: "unknown zone",
            },
        }
    }
}
