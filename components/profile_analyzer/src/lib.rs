//! Profile ingestion and frequency analysis
//!
//! This crate loads basic-block execution profiles recorded by the VM and
//! computes per-function, per-instruction and per-block frequency
//! statistics for a [`BytecodeImage`].
//!
//! # Overview
//!
//! - [`ProfileTrace`] - JSON profile trace (block counts and visit order)
//! - [`ProfileAnalyzer`] - statistics and table dumps over an image
//! - [`StructuredPrinter`] - text or JSON rendering of key/value records
//! - [`AnalysisMode`] - how functions are ranked
//!
//! [`BytecodeImage`]: bytecode_image::BytecodeImage

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod analyzer;
pub mod blocks;
pub mod error;
pub mod mode;
pub mod printer;
pub mod trace;

pub use analyzer::ProfileAnalyzer;
pub use blocks::BasicBlock;
pub use error::{AnalyzerError, AnalyzerResult, ProfileError};
pub use mode::AnalysisMode;
pub use printer::{create_printer, JsonPrinter, OutputFormat, StructuredPrinter, TextPrinter};
pub use trace::{BlockCount, BlockVisit, ProfileTrace};
