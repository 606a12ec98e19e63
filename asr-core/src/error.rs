/// Error types for report handling
use thiserror::Error;

use crate::report::ReportId;

/// Main error type for report operations
#[derive(Error, Debug)]
pub enum Error {
    /// Import JSON was malformed or missing required fields
    #[error("Failed to parse report: {0}")]
    Parse(String),

    /// Report did not match what the operation required
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Underlying store was unavailable or a write failed
    #[error("Storage operation failed: {0}")]
    Storage(String),

    /// Rendering or writing an export failed
    #[error("Export failed: {0}")]
    Export(String),

    /// No record with this id
    #[error("Report not found: {0}")]
    NotFound(ReportId),
}

impl Error {
    pub fn storage(e: impl std::fmt::Display) -> Self {
        Error::Storage(e.to_string())
    }

    pub fn export(e: impl std::fmt::Display) -> Self {
        Error::Export(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse(e.to_string())
    }
}

/// Type alias for Results using Error
pub type Result<T> = std::result::Result<T, Error>;
