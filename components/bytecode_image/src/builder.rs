//! Image writer
//!
//! Produces files in the format accepted by [`BytecodeImage::from_bytes`].
//!
//! [`BytecodeImage::from_bytes`]: crate::BytecodeImage::from_bytes

use crate::image::{FUNCTION_HEADER_SIZE, HEADER_SIZE, MAGIC, VERSION};
use crate::instruction::{Instruction, Operand};
use crate::opcode::Opcode;

/// Bytecode and metadata of one function under construction
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBuilder {
    name: String,
    filename_id: u32,
    line: u32,
    column: u32,
    param_count: u32,
    frame_size: u32,
    code: Vec<u8>,
}

impl FunctionBuilder {
    /// Create an empty function defined at `filename_id:line:column`
    pub fn new(name: &str, filename_id: u32, line: u32, column: u32) -> Self {
        Self {
            name: name.to_string(),
            filename_id,
            line,
            column,
            param_count: 0,
            frame_size: 0,
            code: Vec::new(),
        }
    }

    /// Set the declared parameter count
    pub fn with_params(mut self, param_count: u32) -> Self {
        self.param_count = param_count;
        self
    }

    /// Set the register frame size
    pub fn with_frame_size(mut self, frame_size: u32) -> Self {
        self.frame_size = frame_size;
        self
    }

    /// Offset at which the next instruction will be emitted
    pub fn offset(&self) -> u32 {
        self.code.len() as u32
    }

    /// Emit an instruction and return its function-relative offset
    pub fn emit(&mut self, opcode: Opcode, operands: Vec<Operand>) -> u32 {
        let offset = self.offset();
        Instruction::new(opcode, operands).encode(&mut self.code);
        offset
    }

    /// Size of the bytecode emitted so far
    pub fn code_size(&self) -> usize {
        self.code.len()
    }
}

#[derive(Debug, Clone)]
struct PendingFunction {
    name_id: u32,
    function: FunctionBuilder,
}

/// Builder for complete image files
#[derive(Debug, Clone, Default)]
pub struct ImageBuilder {
    strings: Vec<String>,
    filenames: Vec<String>,
    functions: Vec<PendingFunction>,
    global_function: u32,
    epilogue: Vec<u8>,
}

impl ImageBuilder {
    /// Create an empty image builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string and return its string table index
    pub fn add_string(&mut self, text: &str) -> u32 {
        intern(&mut self.strings, text)
    }

    /// Intern a filename and return its filename table index
    pub fn add_filename(&mut self, name: &str) -> u32 {
        intern(&mut self.filenames, name)
    }

    /// Add a function and return its function id
    pub fn add_function(&mut self, function: FunctionBuilder) -> u32 {
        let name_id = self.add_string(&function.name);
        let id = self.functions.len() as u32;
        self.functions.push(PendingFunction { name_id, function });
        id
    }

    /// Mark a function as the top-level function
    pub fn set_global_function(&mut self, id: u32) {
        self.global_function = id;
    }

    /// Set the bytes appended after the function bodies
    pub fn set_epilogue(&mut self, epilogue: Vec<u8>) {
        self.epilogue = epilogue;
    }

    /// Serialize the image
    pub fn to_bytes(&self) -> Vec<u8> {
        let table_size =
            |entries: &[String]| -> usize { entries.iter().map(|s| 4 + s.len()).sum() };
        let bodies_size: usize = self.functions.iter().map(|f| f.function.code.len()).sum();
        let bodies_start = HEADER_SIZE
            + table_size(&self.strings)
            + table_size(&self.filenames)
            + self.functions.len() * FUNCTION_HEADER_SIZE;

        let mut bytes = Vec::with_capacity(bodies_start + bodies_size + self.epilogue.len());

        // Header
        bytes.extend_from_slice(&MAGIC);
        bytes.push(VERSION);
        for field in [
            self.global_function,
            self.functions.len() as u32,
            self.strings.len() as u32,
            self.filenames.len() as u32,
            bodies_size as u32,
        ] {
            bytes.extend_from_slice(&field.to_le_bytes());
        }

        // String and filename tables
        for entry in self.strings.iter().chain(&self.filenames) {
            bytes.extend_from_slice(&(entry.len() as u32).to_le_bytes());
            bytes.extend_from_slice(entry.as_bytes());
        }

        // Function headers
        let mut body_offset = bodies_start as u32;
        for pending in &self.functions {
            let f = &pending.function;
            for field in [
                pending.name_id,
                f.filename_id,
                f.line,
                f.column,
                f.param_count,
                f.frame_size,
                body_offset,
                f.code.len() as u32,
            ] {
                bytes.extend_from_slice(&field.to_le_bytes());
            }
            body_offset += f.code.len() as u32;
        }

        // Function bodies
        for pending in &self.functions {
            bytes.extend_from_slice(&pending.function.code);
        }

        bytes.extend_from_slice(&self.epilogue);
        bytes
    }
}

fn intern(table: &mut Vec<String>, text: &str) -> u32 {
    if let Some(idx) = table.iter().position(|s| s == text) {
        return idx as u32;
    }
    table.push(text.to_string());
    (table.len() - 1) as u32
}
