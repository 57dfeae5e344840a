//! Error types for the CLI

use std::path::PathBuf;

use bytecode_image::ImageError;
use profile_analyzer::ProfileError;
use rustyline::error::ReadlineError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Writing to the output sink or reading input failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The bytecode image could not be read
    #[error("fail to open file: {}: {source}", path.display())]
    OpenInput {
        /// Image path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The bytecode image could not be decoded
    #[error("fail to deserialize bytecode: {}: {source}", path.display())]
    Decode {
        /// Image path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: ImageError,
    },

    /// The output file could not be created
    #[error("fail to open file {}: {source}", path.display())]
    OpenOutput {
        /// Output path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The profile file could not be read or parsed
    #[error("fail to load profile: {}: {source}", path.display())]
    Profile {
        /// Profile path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: ProfileError,
    },

    /// The line editor failed
    #[error("line editor: {0}")]
    Readline(#[from] ReadlineError),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
