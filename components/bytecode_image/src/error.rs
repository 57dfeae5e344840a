//! Decoder error types

use thiserror::Error;

/// Errors produced while decoding a bytecode image
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// The buffer does not start with the image magic
    #[error("invalid magic number")]
    BadMagic,

    /// The header carries a version this decoder does not understand
    #[error("unsupported bytecode version: {0}")]
    UnsupportedVersion(u8),

    /// A section ends before its declared contents
    #[error("truncated {section} at byte offset {offset}")]
    Truncated {
        /// Section being decoded
        section: &'static str,
        /// Offset at which more bytes were required
        offset: usize,
    },

    /// A string or filename table entry is not valid UTF-8
    #[error("invalid UTF-8 in {section} entry {index}")]
    InvalidUtf8 {
        /// Table being decoded
        section: &'static str,
        /// Entry index within the table
        index: u32,
    },

    /// A function body lies outside the function-bodies section
    #[error("function {function} body {start}..{end} lies outside the function bodies section")]
    FunctionOutOfBounds {
        /// Function id
        function: u32,
        /// Declared absolute start offset
        start: u64,
        /// Declared absolute end offset
        end: u64,
    },

    /// The header names a global function that does not exist
    #[error("global function id {0} is out of range")]
    InvalidGlobalFunction(u32),

    /// An unknown opcode byte was found in a function body
    #[error("unknown opcode 0x{byte:02x} at offset {offset}")]
    UnknownOpcode {
        /// The offending byte
        byte: u8,
        /// Function-relative offset
        offset: u32,
    },

    /// An instruction runs past the end of its function body
    #[error("instruction at offset {offset} runs past the end of the function")]
    TruncatedInstruction {
        /// Function-relative offset of the instruction
        offset: u32,
    },

    /// A function id does not name a function in the image
    #[error("invalid function id: {0}")]
    InvalidFunctionId(u32),
}

/// Result type for image operations
pub type ImageResult<T> = Result<T, ImageError>;
