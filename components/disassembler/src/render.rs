//! Disassembly renderer

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use bytecode_image::{BytecodeImage, Instruction, Operand};

use crate::error::{DisassembleError, DisassembleResult};
use crate::options::RenderOptions;

/// Width of the mnemonic column in pretty output
const MNEMONIC_WIDTH: usize = 18;

/// Renders bytecode image functions as instruction text
#[derive(Debug, Clone)]
pub struct Disassembler {
    image: Arc<BytecodeImage>,
    options: RenderOptions,
}

impl Disassembler {
    /// Create a disassembler with no options set
    pub fn new(image: Arc<BytecodeImage>) -> Self {
        Self {
            image,
            options: RenderOptions::NONE,
        }
    }

    /// The image being rendered
    pub fn image(&self) -> &Arc<BytecodeImage> {
        &self.image
    }

    /// Current rendering options
    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Replace the rendering options
    pub fn set_options(&mut self, options: RenderOptions) {
        self.options = options;
    }

    /// Render the whole image: a summary banner followed by every function
    pub fn disassemble(&self, out: &mut dyn Write) -> DisassembleResult<()> {
        let image = &self.image;
        writeln!(
            out,
            "Bytecode image: {} functions, {} strings, {} filenames, {} bytes",
            image.function_count(),
            image.strings().len(),
            image.filenames().len(),
            image.len()
        )?;
        writeln!(out, "Global function: {}", image.global_function_id())?;
        for id in 0..image.function_count() {
            writeln!(out)?;
            self.disassemble_function(id, out)?;
        }
        Ok(())
    }

    /// Render a single function
    ///
    /// # Errors
    /// Returns `DisassembleError::InvalidFunctionId` if `id` is out of range
    /// and `DisassembleError::Decode` if its body cannot be decoded.
    pub fn disassemble_function(&self, id: u32, out: &mut dyn Write) -> DisassembleResult<()> {
        let header = *self
            .image
            .function(id)
            .ok_or(DisassembleError::InvalidFunctionId(id))?;
        let instructions = self
            .image
            .instructions(id)
            .map_err(|source| DisassembleError::Decode {
                function: id,
                source,
            })?;

        write!(out, "Function<{}>", self.image.function_name(id))?;
        if self.options.contains(RenderOptions::INCLUDE_FUNCTION_IDS) {
            write!(out, "{}", id)?;
        }
        writeln!(
            out,
            "({} params, {} registers):",
            header.param_count, header.frame_size
        )?;

        if self.options.contains(RenderOptions::INCLUDE_SOURCE) {
            writeln!(
                out,
                "  Source location: {}:{}:{}",
                self.image.filename(header.filename_id).unwrap_or("<unknown>"),
                header.line,
                header.column
            )?;
        }

        let labels = if self.options.contains(RenderOptions::PRETTY) {
            jump_labels(&instructions)
        } else {
            BTreeMap::new()
        };

        for inst in &instructions {
            if let Some(label) = labels.get(&inst.offset) {
                writeln!(out, "L{}:", label)?;
            }
            write!(out, "    ")?;
            if self.options.contains(RenderOptions::INCLUDE_VIRTUAL_OFFSETS) {
                write!(out, "[@ {}] ", header.offset + inst.offset)?;
            }
            writeln!(out, "{}", self.render_instruction(inst, &labels))?;
        }
        Ok(())
    }

    fn render_instruction(&self, inst: &Instruction, labels: &BTreeMap<u32, usize>) -> String {
        let operands: Vec<String> = inst
            .operands
            .iter()
            .map(|operand| self.render_operand(inst, operand, labels))
            .collect();
        let name = inst.opcode.name();
        if operands.is_empty() {
            name.to_string()
        } else if self.options.contains(RenderOptions::PRETTY) {
            format!("{:<width$}{}", name, operands.join(", "), width = MNEMONIC_WIDTH)
        } else {
            format!("{} {}", name, operands.join(", "))
        }
    }

    fn render_operand(
        &self,
        inst: &Instruction,
        operand: &Operand,
        labels: &BTreeMap<u32, usize>,
    ) -> String {
        let pretty = self.options.contains(RenderOptions::PRETTY);
        match *operand {
            Operand::Reg(r) => format!("r{}", r),
            Operand::UInt8(v) => v.to_string(),
            Operand::UInt32(v) => v.to_string(),
            Operand::Imm32(v) => v.to_string(),
            Operand::StringId(id) if pretty => match self.image.string(id) {
                Some(text) => format!("{:?}", text),
                None => format!("<string {}>", id),
            },
            Operand::FunctionId(id) if pretty => {
                format!("Function<{}>", self.image.function_name(id))
            }
            Operand::StringId(id) | Operand::FunctionId(id) => id.to_string(),
            Operand::Jump(delta) => inst
                .jump_target()
                .and_then(|target| labels.get(&target))
                .map(|label| format!("L{}", label))
                .unwrap_or_else(|| delta.to_string()),
        }
    }
}

/// Assign `L1`, `L2`, ... to jump targets that land on an instruction, in offset order
fn jump_labels(instructions: &[Instruction]) -> BTreeMap<u32, usize> {
    let mut targets: Vec<u32> = instructions
        .iter()
        .filter_map(Instruction::jump_target)
        .filter(|target| instructions.iter().any(|i| i.offset == *target))
        .collect();
    targets.sort_unstable();
    targets.dedup();
    targets
        .into_iter()
        .enumerate()
        .map(|(idx, offset)| (offset, idx + 1))
        .collect()
}
