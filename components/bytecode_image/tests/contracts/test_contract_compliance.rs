//! Contract compliance tests for bytecode_image
//! Verifies the public surface used by the disassembler and analyzer

use bytecode_image::{
    BytecodeImage, FunctionHeader, ImageBuilder, ImageError, ImageResult, Instruction, Opcode,
    Operand, OperandKind, Section,
};

/// Verify the operand layout of every control-flow opcode
#[test]
fn test_contract_jump_layouts() {
    assert_eq!(Opcode::Jmp.operand_kinds(), &[OperandKind::Jump]);
    assert_eq!(
        Opcode::JmpTrue.operand_kinds(),
        &[OperandKind::Jump, OperandKind::Reg]
    );
    assert_eq!(
        Opcode::JmpFalse.operand_kinds(),
        &[OperandKind::Jump, OperandKind::Reg]
    );
    assert!(Opcode::Ret.is_unconditional_terminator());
    assert!(Opcode::Throw.is_unconditional_terminator());
}

/// Verify the empty image decodes and exposes every section
#[test]
fn test_contract_empty_image() {
    let result: ImageResult<BytecodeImage> =
        BytecodeImage::from_bytes(ImageBuilder::new().to_bytes());
    let image = result.unwrap();

    assert_eq!(image.function_count(), 0);
    assert_eq!(image.len(), bytecode_image::image::HEADER_SIZE);
    let sections: &[Section] = image.sections();
    assert_eq!(sections.len(), 6);
    assert!(sections[1..].iter().all(|s| s.size() == 0));
}

/// Verify FunctionHeader containment is half-open
#[test]
fn test_contract_function_header_contains() {
    let header = FunctionHeader {
        name_id: 0,
        filename_id: 0,
        line: 1,
        column: 1,
        param_count: 0,
        frame_size: 0,
        offset: 100,
        size: 10,
    };
    assert!(!header.contains(99));
    assert!(header.contains(100));
    assert!(header.contains(109));
    assert!(!header.contains(110));
}

/// Verify empty input is rejected rather than panicking
#[test]
fn test_contract_empty_buffer() {
    assert!(matches!(
        BytecodeImage::from_bytes(Vec::new()),
        Err(ImageError::Truncated { offset: 0, .. })
    ));
}

/// Verify instruction construction with the public operand types
#[test]
fn test_contract_instruction_surface() {
    let inst = Instruction::new(Opcode::Mov, vec![Operand::Reg(0), Operand::Reg(1)]);
    assert_eq!(inst.size(), 3);
    assert_eq!(inst.next_offset(), 3);
}
