//! Bytecode opcodes for the image format
//!
//! Every instruction is a one-byte opcode followed by fixed-width operands.
//! The operand layout of each opcode is fixed by [`Opcode::operand_kinds`].

/// Kind and encoded width of a single instruction operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandKind {
    /// Register index (1 byte)
    Reg,
    /// Unsigned 8-bit immediate
    UInt8,
    /// Unsigned 32-bit immediate
    UInt32,
    /// Signed 32-bit immediate
    Imm32,
    /// Index into the image string table (4 bytes)
    StringId,
    /// Index into the image function table (4 bytes)
    FunctionId,
    /// Relative jump distance from the start of the instruction (4 bytes, signed)
    Jump,
}

impl OperandKind {
    /// Number of bytes this operand occupies in the encoded stream
    pub fn width(self) -> usize {
        match self {
            OperandKind::Reg | OperandKind::UInt8 => 1,
            OperandKind::UInt32
            | OperandKind::Imm32
            | OperandKind::StringId
            | OperandKind::FunctionId
            | OperandKind::Jump => 4,
        }
    }
}

macro_rules! define_opcodes {
    ($($(#[$doc:meta])* $name:ident = $byte:literal => [$($kind:ident),*];)*) => {
        /// Bytecode opcodes understood by the decoder and disassembler
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Opcode {
            $($(#[$doc])* $name = $byte,)*
        }

        impl Opcode {
            /// All opcodes in encoding order
            pub const ALL: &'static [Opcode] = &[$(Opcode::$name,)*];

            /// Decode an opcode byte
            pub fn from_byte(byte: u8) -> Option<Self> {
                match byte {
                    $($byte => Some(Opcode::$name),)*
                    _ => None,
                }
            }

            /// Mnemonic used in disassembly and statistics output
            pub fn name(self) -> &'static str {
                match self {
                    $(Opcode::$name => stringify!($name),)*
                }
            }

            /// Operand layout following the opcode byte
            pub fn operand_kinds(self) -> &'static [OperandKind] {
                match self {
                    $(Opcode::$name => &[$(OperandKind::$kind),*],)*
                }
            }
        }
    };
}

define_opcodes! {
    /// Marks code that must never execute
    Unreachable = 0x00 => [];
    /// dst = src
    Mov = 0x01 => [Reg, Reg];
    /// dst = small unsigned constant
    LoadConstUInt8 = 0x02 => [Reg, UInt8];
    /// dst = 32-bit integer constant
    LoadConstInt = 0x03 => [Reg, Imm32];
    /// dst = string table entry
    LoadConstString = 0x04 => [Reg, StringId];
    /// dst = undefined
    LoadConstUndefined = 0x05 => [Reg];
    /// dst = null
    LoadConstNull = 0x06 => [Reg];
    /// dst = true
    LoadConstTrue = 0x07 => [Reg];
    /// dst = false
    LoadConstFalse = 0x08 => [Reg];
    /// dst = parameter at index
    LoadParam = 0x09 => [Reg, UInt8];
    /// dst = lhs + rhs
    Add = 0x10 => [Reg, Reg, Reg];
    /// dst = lhs - rhs
    Sub = 0x11 => [Reg, Reg, Reg];
    /// dst = lhs * rhs
    Mul = 0x12 => [Reg, Reg, Reg];
    /// dst = lhs / rhs
    Div = 0x13 => [Reg, Reg, Reg];
    /// dst = lhs % rhs
    Mod = 0x14 => [Reg, Reg, Reg];
    /// dst = -src
    Negate = 0x15 => [Reg, Reg];
    /// dst = !src
    Not = 0x16 => [Reg, Reg];
    /// dst = lhs == rhs
    Eq = 0x18 => [Reg, Reg, Reg];
    /// dst = lhs === rhs
    StrictEq = 0x19 => [Reg, Reg, Reg];
    /// dst = lhs < rhs
    Less = 0x1a => [Reg, Reg, Reg];
    /// dst = lhs <= rhs
    LessEq = 0x1b => [Reg, Reg, Reg];
    /// dst = lhs > rhs
    Greater = 0x1c => [Reg, Reg, Reg];
    /// dst = lhs >= rhs
    GreaterEq = 0x1d => [Reg, Reg, Reg];
    /// dst = global named by string id
    GetGlobal = 0x20 => [Reg, StringId];
    /// global named by string id = src
    PutGlobal = 0x21 => [StringId, Reg];
    /// dst = obj.name
    GetById = 0x22 => [Reg, Reg, StringId];
    /// obj.name = src
    PutById = 0x23 => [Reg, StringId, Reg];
    /// dst = {}
    NewObject = 0x24 => [Reg];
    /// dst = closure over function id
    CreateClosure = 0x30 => [Reg, FunctionId];
    /// dst = callee(argc arguments)
    Call = 0x31 => [Reg, Reg, UInt8];
    /// Unconditional relative jump
    Jmp = 0x40 => [Jump];
    /// Jump when the register is truthy
    JmpTrue = 0x41 => [Jump, Reg];
    /// Jump when the register is falsy
    JmpFalse = 0x42 => [Jump, Reg];
    /// Return the register value
    Ret = 0x50 => [Reg];
    /// Throw the register value
    Throw = 0x51 => [Reg];
}

impl Opcode {
    /// Encoded size of an instruction with this opcode, opcode byte included
    pub fn encoded_len(self) -> usize {
        1 + self
            .operand_kinds()
            .iter()
            .map(|kind| kind.width())
            .sum::<usize>()
    }

    /// Check if this opcode transfers control to a jump target
    pub fn is_jump(self) -> bool {
        matches!(self, Opcode::Jmp | Opcode::JmpTrue | Opcode::JmpFalse)
    }

    /// Check if this opcode ends a basic block
    pub fn is_terminator(self) -> bool {
        self.is_jump() || self.is_unconditional_terminator()
    }

    /// Check if control never falls through to the next instruction
    pub fn is_unconditional_terminator(self) -> bool {
        matches!(
            self,
            Opcode::Jmp | Opcode::Ret | Opcode::Throw | Opcode::Unreachable
        )
    }

    /// Check if this opcode is a binary arithmetic operation
    pub fn is_binary_arithmetic(self) -> bool {
        matches!(
            self,
            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div | Opcode::Mod
        )
    }
}
