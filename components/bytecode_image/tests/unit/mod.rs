//! Unit tests for bytecode_image

mod test_image;
mod test_instruction;
