//! Image and Disassembler Integration Tests
//!
//! Decode the sample program and render it through the disassembler.

use std::fs;
use std::sync::Arc;

use bytecode_image::section::names;
use bytecode_image::BytecodeImage;
use disassembler::{Disassembler, RenderOptions};
use dump_cli::bootstrap::load_image;
use integration_tests::fixtures::{sample_image_bytes, GLOBAL, SUM};
use profile_analyzer::{AnalysisMode, ProfileAnalyzer};
use tempfile::TempDir;

fn sample() -> Arc<BytecodeImage> {
    Arc::new(BytecodeImage::from_bytes(sample_image_bytes()).unwrap())
}

/// Test: image written to disk decodes to the same tables
#[test]
fn test_image_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sum.bc");
    fs::write(&path, sample_image_bytes()).unwrap();

    let image = load_image(&path).unwrap();
    assert_eq!(image.function_count(), 2);
    assert_eq!(image.global_function_id(), GLOBAL);
    assert_eq!(image.function_name(SUM), "sum");
    assert_eq!(image.filenames(), &["sum.js".to_string()]);
    assert_eq!(image.epilogue(), b"SRC-HASH");
}

/// Test: sections tile the file and bodies sit inside the bodies section
#[test]
fn test_sections_tile_file() {
    let image = sample();
    let sections = image.sections();
    assert_eq!(sections.first().unwrap().start(), 0);
    assert_eq!(sections.last().unwrap().end(), image.len());
    for pair in sections.windows(2) {
        assert_eq!(pair[0].end(), pair[1].start());
    }

    let bodies = image.section(names::FUNCTION_BODIES).unwrap();
    for f in image.functions() {
        assert!(bodies.range.contains(&(f.offset as usize)));
        assert!(f.end() as usize <= bodies.end());
    }
}

/// Test: pretty disassembly of the loop uses labels
#[test]
fn test_pretty_loop_disassembly() {
    let mut disassembler = Disassembler::new(sample());
    disassembler.set_options(RenderOptions::baseline(true));
    let mut out = Vec::new();
    disassembler.disassemble_function(SUM, &mut out).unwrap();

    let expected = [
        "Function<sum>1(1 params, 3 registers):",
        "  Source location: sum.js:3:1",
        "    LoadConstUInt8    r0, 0",
        "    LoadParam         r1, 1",
        "    LoadConstUInt8    r2, 1",
        "L1:",
        "    JmpFalse          L2, r1",
        "    Add               r0, r0, r1",
        "    Sub               r1, r1, r2",
        "    Jmp               L1",
        "L2:",
        "    Ret               r0",
    ];
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().collect::<Vec<_>>(), expected);
}

/// Test: plain disassembly shows raw operands
#[test]
fn test_plain_global_disassembly() {
    let mut disassembler = Disassembler::new(sample());
    disassembler.set_options(RenderOptions::baseline(false));
    let mut out = Vec::new();
    disassembler.disassemble_function(GLOBAL, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("    CreateClosure r0, 1\n"));
    assert!(text.contains("    PutGlobal 0, r0\n"));
    assert!(text.contains("    Call r3, r2, 1\n"));
}

/// Test: virtual offsets point into the function body
#[test]
fn test_virtual_offsets_resolve_back() {
    let image = sample();
    let mut disassembler = Disassembler::new(Arc::clone(&image));
    disassembler.set_options(RenderOptions::INCLUDE_VIRTUAL_OFFSETS);
    let mut out = Vec::new();
    disassembler.disassemble(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let analyzer = ProfileAnalyzer::new(Arc::clone(&image), None, AnalysisMode::Instruction);
    let offsets: Vec<u32> = text
        .lines()
        .filter_map(|line| line.trim_start().strip_prefix("[@ "))
        .map(|rest| rest.split(']').next().unwrap().parse().unwrap())
        .collect();
    assert_eq!(offsets.len(), 15);
    for offset in offsets {
        assert!(analyzer.function_from_virtual_offset(offset).is_some());
    }
}

/// Test: every jump in the loop lands on a block boundary
#[test]
fn test_jump_targets_are_block_starts() {
    let image = sample();
    let analyzer = ProfileAnalyzer::new(Arc::clone(&image), None, AnalysisMode::Instruction);
    let blocks = analyzer.basic_blocks(SUM).unwrap();
    for inst in image.instructions(SUM).unwrap() {
        if let Some(target) = inst.jump_target() {
            assert!(blocks.iter().any(|b| b.start == target), "target {}", target);
        }
    }
}
