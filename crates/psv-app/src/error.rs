//! Error types for the psv-app service layer.

use std::path::PathBuf;

/// Application error type shared by all front ends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Case error: {0}")]
    Case(String),

    #[error("Failed to read case file: {path}")]
    CaseFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Case validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Sizing(#[from] psv_sizing::SizingError),

    #[error("History error: {0}")]
    History(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for psv-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<psv_project::ProjectError> for AppError {
    fn from(err: psv_project::ProjectError) -> Self {
        match err {
            psv_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Case(other.to_string()),
        }
    }
}

impl From<psv_project::ValidationError> for AppError {
    fn from(err: psv_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<psv_results::HistoryError> for AppError {
    fn from(err: psv_results::HistoryError) -> Self {
        AppError::History(err.to_string())
    }
}
