//! Error types for profile loading and analysis

use thiserror::Error;

/// Errors produced while loading a profile trace
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The trace could not be read
    #[error("cannot read profile: {0}")]
    Io(#[from] std::io::Error),

    /// The trace is not valid profile JSON
    #[error("malformed profile: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors produced by analysis dumps
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// No function with this id exists in the image
    #[error("invalid function id: {0}")]
    InvalidFunctionId(u32),

    /// No string with this id exists in the image
    #[error("invalid string id: {0}")]
    InvalidStringId(u32),

    /// No filename with this id exists in the image
    #[error("invalid filename id: {0}")]
    InvalidFilenameId(u32),

    /// Writing to the output sink failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for analysis operations
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
