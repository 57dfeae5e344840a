//! Integration test suite for the bytecode dump tool
//!
//! This crate provides integration tests that verify the image decoder,
//! disassembler, profile analyzer and command interpreter work together
//! across component boundaries.

/// Re-export components for test convenience
pub mod components {
    pub use bytecode_image;
    pub use disassembler;
    pub use dump_cli;
    pub use profile_analyzer;
}

/// Shared sample program and profile
pub mod fixtures {
    use bytecode_image::{FunctionBuilder, ImageBuilder, Opcode, Operand};
    use profile_analyzer::{BlockCount, BlockVisit, ProfileTrace};

    /// Function id of the top-level function
    pub const GLOBAL: u32 = 0;
    /// Function id of the summing loop
    pub const SUM: u32 = 1;

    /// Block start offsets of the summing loop
    pub const SUM_BLOCKS: [u32; 4] = [0, 9, 15, 28];

    /// Serialized image of a program that defines and calls a summing loop
    ///
    /// ```text
    /// global:                      sum(n):
    ///    CreateClosure r0, sum      0: LoadConstUInt8 r0, 0
    ///    PutGlobal "sum", r0        3: LoadParam r1, 1
    ///    LoadConstString r1, "hi"   6: LoadConstUInt8 r2, 1
    ///    GetGlobal r2, "print"      9: JmpFalse 28, r1
    ///    Call r3, r2, 1            15: Add r0, r0, r1
    ///    LoadConstUndefined r0     19: Sub r1, r1, r2
    ///    Ret r0                    23: Jmp 9
    ///                              28: Ret r0
    /// ```
    pub fn sample_image_bytes() -> Vec<u8> {
        let mut builder = ImageBuilder::new();
        let file = builder.add_filename("sum.js");
        let sum_name = builder.add_string("sum");
        let hi = builder.add_string("hi");
        let print = builder.add_string("print");

        let mut global = FunctionBuilder::new("global", file, 1, 1).with_frame_size(4);
        global.emit(Opcode::CreateClosure, vec![Operand::Reg(0), Operand::FunctionId(SUM)]);
        global.emit(Opcode::PutGlobal, vec![Operand::StringId(sum_name), Operand::Reg(0)]);
        global.emit(Opcode::LoadConstString, vec![Operand::Reg(1), Operand::StringId(hi)]);
        global.emit(Opcode::GetGlobal, vec![Operand::Reg(2), Operand::StringId(print)]);
        global.emit(
            Opcode::Call,
            vec![Operand::Reg(3), Operand::Reg(2), Operand::UInt8(1)],
        );
        global.emit(Opcode::LoadConstUndefined, vec![Operand::Reg(0)]);
        global.emit(Opcode::Ret, vec![Operand::Reg(0)]);

        let mut sum = FunctionBuilder::new("sum", file, 3, 1)
            .with_params(1)
            .with_frame_size(3);
        sum.emit(Opcode::LoadConstUInt8, vec![Operand::Reg(0), Operand::UInt8(0)]);
        sum.emit(Opcode::LoadParam, vec![Operand::Reg(1), Operand::UInt8(1)]);
        sum.emit(Opcode::LoadConstUInt8, vec![Operand::Reg(2), Operand::UInt8(1)]);
        sum.emit(Opcode::JmpFalse, vec![Operand::Jump(19), Operand::Reg(1)]);
        sum.emit(
            Opcode::Add,
            vec![Operand::Reg(0), Operand::Reg(0), Operand::Reg(1)],
        );
        sum.emit(
            Opcode::Sub,
            vec![Operand::Reg(1), Operand::Reg(1), Operand::Reg(2)],
        );
        sum.emit(Opcode::Jmp, vec![Operand::Jump(-14)]);
        sum.emit(Opcode::Ret, vec![Operand::Reg(0)]);

        builder.add_function(global);
        builder.add_function(sum);
        builder.set_global_function(GLOBAL);
        builder.set_epilogue(b"SRC-HASH".to_vec());
        builder.to_bytes()
    }

    /// Profile of one call `sum(10)`
    pub fn sample_profile() -> ProfileTrace {
        let record = |function, offset, count| BlockCount {
            function,
            offset,
            count,
        };
        let mut trace = vec![
            BlockVisit {
                function: GLOBAL,
                offset: 0,
            },
            BlockVisit {
                function: SUM,
                offset: 0,
            },
        ];
        for _ in 0..10 {
            trace.push(BlockVisit {
                function: SUM,
                offset: 9,
            });
            trace.push(BlockVisit {
                function: SUM,
                offset: 15,
            });
        }
        trace.push(BlockVisit {
            function: SUM,
            offset: 9,
        });
        trace.push(BlockVisit {
            function: SUM,
            offset: 28,
        });

        ProfileTrace {
            blocks: vec![
                record(GLOBAL, 0, 1),
                record(SUM, 0, 1),
                record(SUM, 9, 11),
                record(SUM, 15, 10),
                record(SUM, 28, 1),
            ],
            trace,
        }
    }
}
