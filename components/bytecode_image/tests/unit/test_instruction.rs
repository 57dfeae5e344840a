//! Tests for instruction decoding over whole function bodies

use bytecode_image::instruction::decode_all;
use bytecode_image::{FunctionBuilder, Opcode, Operand};

#[test]
fn test_decode_branching_function() {
    let mut f = FunctionBuilder::new("f", 0, 1, 1);
    f.emit(Opcode::LoadParam, vec![Operand::Reg(0), Operand::UInt8(1)]);
    let jump_at = f.emit(Opcode::JmpFalse, vec![Operand::Jump(10), Operand::Reg(0)]);
    f.emit(Opcode::LoadConstTrue, vec![Operand::Reg(1)]);
    f.emit(Opcode::Ret, vec![Operand::Reg(1)]);
    let target = f.emit(Opcode::LoadConstFalse, vec![Operand::Reg(1)]);
    f.emit(Opcode::Ret, vec![Operand::Reg(1)]);

    // JmpFalse is 6 bytes, LoadConstTrue 2, Ret 2
    assert_eq!(jump_at, 3);
    assert_eq!(target, 13);

    let mut image = bytecode_image::ImageBuilder::new();
    image.add_filename("a.js");
    image.add_function(f);
    let image = bytecode_image::BytecodeImage::from_bytes(image.to_bytes()).unwrap();
    let body = image.bytecode(0).unwrap();
    let insts = decode_all(body).unwrap();

    assert_eq!(insts.len(), 6);
    assert_eq!(insts[1].opcode, Opcode::JmpFalse);
    assert_eq!(insts[1].jump_target(), Some(13));
    assert_eq!(insts[4].offset, 13);
}

#[test]
fn test_every_opcode_encodes_to_its_declared_length() {
    for op in Opcode::ALL {
        let operands = op
            .operand_kinds()
            .iter()
            .map(|kind| match kind {
                bytecode_image::OperandKind::Reg => Operand::Reg(1),
                bytecode_image::OperandKind::UInt8 => Operand::UInt8(2),
                bytecode_image::OperandKind::UInt32 => Operand::UInt32(3),
                bytecode_image::OperandKind::Imm32 => Operand::Imm32(-4),
                bytecode_image::OperandKind::StringId => Operand::StringId(5),
                bytecode_image::OperandKind::FunctionId => Operand::FunctionId(6),
                bytecode_image::OperandKind::Jump => Operand::Jump(7),
            })
            .collect();
        let inst = bytecode_image::Instruction::new(*op, operands);
        let mut bytes = Vec::new();
        inst.encode(&mut bytes);
        assert_eq!(bytes.len(), op.encoded_len(), "{}", op.name());
    }
}
