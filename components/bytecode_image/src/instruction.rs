//! Bytecode instruction representation
//!
//! Contains the decoded instruction structure and the codec between
//! instructions and the raw function body bytes.

use crate::error::{ImageError, ImageResult};
use crate::opcode::{OperandKind, Opcode};

/// A decoded instruction operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// Register index
    Reg(u8),
    /// Unsigned 8-bit immediate
    UInt8(u8),
    /// Unsigned 32-bit immediate
    UInt32(u32),
    /// Signed 32-bit immediate
    Imm32(i32),
    /// String table index
    StringId(u32),
    /// Function table index
    FunctionId(u32),
    /// Relative jump distance from the start of the instruction
    Jump(i32),
}

impl Operand {
    /// The layout kind of this operand
    pub fn kind(&self) -> OperandKind {
        match self {
            Operand::Reg(_) => OperandKind::Reg,
            Operand::UInt8(_) => OperandKind::UInt8,
            Operand::UInt32(_) => OperandKind::UInt32,
            Operand::Imm32(_) => OperandKind::Imm32,
            Operand::StringId(_) => OperandKind::StringId,
            Operand::FunctionId(_) => OperandKind::FunctionId,
            Operand::Jump(_) => OperandKind::Jump,
        }
    }

    fn encode(&self, bytes: &mut Vec<u8>) {
        match *self {
            Operand::Reg(v) | Operand::UInt8(v) => bytes.push(v),
            Operand::UInt32(v) | Operand::StringId(v) | Operand::FunctionId(v) => {
                bytes.extend_from_slice(&v.to_le_bytes())
            }
            Operand::Imm32(v) | Operand::Jump(v) => bytes.extend_from_slice(&v.to_le_bytes()),
        }
    }

    fn decode(kind: OperandKind, bytes: &[u8]) -> Self {
        let word = || [bytes[0], bytes[1], bytes[2], bytes[3]];
        match kind {
            OperandKind::Reg => Operand::Reg(bytes[0]),
            OperandKind::UInt8 => Operand::UInt8(bytes[0]),
            OperandKind::UInt32 => Operand::UInt32(u32::from_le_bytes(word())),
            OperandKind::Imm32 => Operand::Imm32(i32::from_le_bytes(word())),
            OperandKind::StringId => Operand::StringId(u32::from_le_bytes(word())),
            OperandKind::FunctionId => Operand::FunctionId(u32::from_le_bytes(word())),
            OperandKind::Jump => Operand::Jump(i32::from_le_bytes(word())),
        }
    }
}

/// A single bytecode instruction at a function-relative offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Offset of the opcode byte from the start of the function body
    pub offset: u32,
    /// The opcode for this instruction
    pub opcode: Opcode,
    /// Operands in encoding order
    pub operands: Vec<Operand>,
}

impl Instruction {
    /// Create a new instruction at offset zero
    ///
    /// Operands must match [`Opcode::operand_kinds`] in number and kind.
    pub fn new(opcode: Opcode, operands: Vec<Operand>) -> Self {
        debug_assert!(
            opcode
                .operand_kinds()
                .iter()
                .copied()
                .eq(operands.iter().map(Operand::kind)),
            "operands do not match layout of {}",
            opcode.name()
        );
        Self {
            offset: 0,
            opcode,
            operands,
        }
    }

    /// Encoded size in bytes
    pub fn size(&self) -> usize {
        self.opcode.encoded_len()
    }

    /// Function-relative offset of the instruction that follows this one
    pub fn next_offset(&self) -> u32 {
        self.offset + self.size() as u32
    }

    /// Function-relative jump target, if this is a jump
    pub fn jump_target(&self) -> Option<u32> {
        self.operands.iter().find_map(|operand| match operand {
            Operand::Jump(delta) => u32::try_from(i64::from(self.offset) + i64::from(*delta)).ok(),
            _ => None,
        })
    }

    /// Append the encoded instruction to `bytes`
    pub fn encode(&self, bytes: &mut Vec<u8>) {
        bytes.push(self.opcode as u8);
        for operand in &self.operands {
            operand.encode(bytes);
        }
    }

    /// Decode one instruction from the start of `bytes`
    ///
    /// `offset` is the function-relative position of `bytes[0]`.
    pub fn decode(bytes: &[u8], offset: u32) -> ImageResult<Self> {
        let byte = *bytes
            .first()
            .ok_or(ImageError::TruncatedInstruction { offset })?;
        let opcode = Opcode::from_byte(byte).ok_or(ImageError::UnknownOpcode { byte, offset })?;
        if bytes.len() < opcode.encoded_len() {
            return Err(ImageError::TruncatedInstruction { offset });
        }

        let mut cursor = 1;
        let mut operands = Vec::with_capacity(opcode.operand_kinds().len());
        for kind in opcode.operand_kinds() {
            operands.push(Operand::decode(*kind, &bytes[cursor..]));
            cursor += kind.width();
        }

        Ok(Self {
            offset,
            opcode,
            operands,
        })
    }
}

/// Decode every instruction of a function body
pub fn decode_all(body: &[u8]) -> ImageResult<Vec<Instruction>> {
    let mut instructions = Vec::new();
    let mut offset = 0usize;
    while offset < body.len() {
        let inst = Instruction::decode(&body[offset..], offset as u32)?;
        offset += inst.size();
        instructions.push(inst);
    }
    Ok(instructions)
}
