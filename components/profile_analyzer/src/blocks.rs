//! Basic block partitioning of decoded function bodies

use bytecode_image::{Instruction, Opcode};

/// A straight-line run of instructions with a single entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBlock {
    /// Function-relative offset of the first instruction
    pub start: u32,
    /// Function-relative offset one past the last instruction
    pub end: u32,
    /// Opcodes of the block's instructions in order
    pub opcodes: Vec<Opcode>,
}

impl BasicBlock {
    /// Number of instructions in the block
    pub fn instruction_count(&self) -> usize {
        self.opcodes.len()
    }

    /// Check whether a function-relative offset lies inside the block
    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// Split a function body into basic blocks
///
/// A block starts at offset zero, at every jump target that lands on an
/// instruction boundary, and after every terminator.
pub fn partition(instructions: &[Instruction]) -> Vec<BasicBlock> {
    let Some(last) = instructions.last() else {
        return Vec::new();
    };

    let is_boundary = |offset: u32| {
        instructions
            .binary_search_by_key(&offset, |inst| inst.offset)
            .is_ok()
    };

    let mut leaders: Vec<u32> = vec![0];
    for inst in instructions {
        if let Some(target) = inst.jump_target().filter(|t| is_boundary(*t)) {
            leaders.push(target);
        }
        if inst.opcode.is_terminator() && inst.next_offset() < last.next_offset() {
            leaders.push(inst.next_offset());
        }
    }
    leaders.sort_unstable();
    leaders.dedup();

    let mut blocks: Vec<BasicBlock> = Vec::with_capacity(leaders.len());
    for inst in instructions {
        let starts_block = leaders.binary_search(&inst.offset).is_ok();
        match blocks.last_mut() {
            Some(block) if !starts_block => {
                block.end = inst.next_offset();
                block.opcodes.push(inst.opcode);
            }
            _ => blocks.push(BasicBlock {
                start: inst.offset,
                end: inst.next_offset(),
                opcodes: vec![inst.opcode],
            }),
        }
    }
    blocks
}

/// Index of the block containing a function-relative offset
pub fn block_containing(blocks: &[BasicBlock], offset: u32) -> Option<usize> {
    let idx = blocks.partition_point(|b| b.end <= offset);
    blocks.get(idx).filter(|b| b.contains(offset)).map(|_| idx)
}
