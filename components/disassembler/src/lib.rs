//! Instruction-level disassembly of bytecode images
//!
//! Renders the functions of a [`BytecodeImage`] as human-readable
//! instruction text. What is shown is controlled by [`RenderOptions`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use bytecode_image::{BytecodeImage, FunctionBuilder, ImageBuilder, Opcode, Operand};
//! use disassembler::{Disassembler, RenderOptions};
//!
//! let mut builder = ImageBuilder::new();
//! let mut f = FunctionBuilder::new("global", builder.add_filename("a.js"), 1, 1);
//! f.emit(Opcode::Ret, vec![Operand::Reg(0)]);
//! builder.add_function(f);
//! let image = Arc::new(BytecodeImage::from_bytes(builder.to_bytes()).unwrap());
//!
//! let mut disassembler = Disassembler::new(image);
//! disassembler.set_options(RenderOptions::INCLUDE_FUNCTION_IDS);
//!
//! let mut out = Vec::new();
//! disassembler.disassemble_function(0, &mut out).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("Function<global>0"));
//! ```
//!
//! [`BytecodeImage`]: bytecode_image::BytecodeImage

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod options;
pub mod render;

pub use error::{DisassembleError, DisassembleResult};
pub use options::RenderOptions;
pub use render::Disassembler;
