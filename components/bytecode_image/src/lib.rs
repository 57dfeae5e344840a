//! Bytecode image format
//!
//! This crate defines the on-disk bytecode image inspected by `bcdump`:
//! the opcode table, the instruction codec, the image decoder with its
//! section map, and a builder that writes images.
//!
//! # Example
//!
//! ```
//! use bytecode_image::{BytecodeImage, FunctionBuilder, ImageBuilder, Opcode, Operand};
//!
//! let mut builder = ImageBuilder::new();
//! let file = builder.add_filename("main.js");
//!
//! let mut main = FunctionBuilder::new("global", file, 1, 1).with_frame_size(1);
//! main.emit(Opcode::LoadConstUInt8, vec![Operand::Reg(0), Operand::UInt8(42)]);
//! main.emit(Opcode::Ret, vec![Operand::Reg(0)]);
//! builder.add_function(main);
//!
//! let image = BytecodeImage::from_bytes(builder.to_bytes()).unwrap();
//! assert_eq!(image.function_name(0), "global");
//! assert_eq!(image.instructions(0).unwrap().len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod error;
pub mod image;
pub mod instruction;
pub mod opcode;
pub mod section;

// Re-export main types at crate root
pub use builder::{FunctionBuilder, ImageBuilder};
pub use error::{ImageError, ImageResult};
pub use image::{BytecodeImage, FunctionHeader};
pub use instruction::{Instruction, Operand};
pub use opcode::{OperandKind, Opcode};
pub use section::Section;
