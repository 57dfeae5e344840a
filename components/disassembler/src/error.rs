//! Disassembly error types

use bytecode_image::ImageError;
use thiserror::Error;

/// Errors produced while rendering disassembly
#[derive(Debug, Error)]
pub enum DisassembleError {
    /// The requested function does not exist in the image
    #[error("invalid function id: {0}")]
    InvalidFunctionId(u32),

    /// The function body could not be decoded
    #[error("cannot decode function {function}: {source}")]
    Decode {
        /// Function being rendered
        function: u32,
        /// Underlying decoder error
        #[source]
        source: ImageError,
    },

    /// Writing to the output sink failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for disassembly operations
pub type DisassembleResult<T> = Result<T, DisassembleError>;
