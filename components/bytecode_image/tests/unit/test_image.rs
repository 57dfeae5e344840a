//! Tests for BytecodeImage decoding

use bytecode_image::section::names;
use bytecode_image::{BytecodeImage, FunctionBuilder, ImageBuilder, ImageError, Opcode, Operand};

fn two_function_image() -> ImageBuilder {
    let mut builder = ImageBuilder::new();
    let file = builder.add_filename("app.js");
    let hello = builder.add_string("hello");

    let mut global = FunctionBuilder::new("global", file, 1, 1).with_frame_size(2);
    global.emit(Opcode::CreateClosure, vec![Operand::Reg(0), Operand::FunctionId(1)]);
    global.emit(Opcode::LoadConstString, vec![Operand::Reg(1), Operand::StringId(hello)]);
    global.emit(Opcode::Call, vec![Operand::Reg(1), Operand::Reg(0), Operand::UInt8(1)]);
    global.emit(Opcode::Ret, vec![Operand::Reg(1)]);

    let mut greet = FunctionBuilder::new("greet", file, 4, 10).with_params(1);
    greet.emit(Opcode::LoadParam, vec![Operand::Reg(0), Operand::UInt8(1)]);
    greet.emit(Opcode::Ret, vec![Operand::Reg(0)]);

    builder.add_function(global);
    builder.add_function(greet);
    builder
}

#[test]
fn test_image_tables() {
    let image = BytecodeImage::from_bytes(two_function_image().to_bytes()).unwrap();

    assert_eq!(image.function_count(), 2);
    assert_eq!(image.global_function_id(), 0);
    assert_eq!(image.string(0), Some("hello"));
    assert_eq!(image.string(1), Some("global"));
    assert_eq!(image.string(2), Some("greet"));
    assert_eq!(image.string(3), None);
    assert_eq!(image.filename(0), Some("app.js"));
    assert_eq!(image.function_name(1), "greet");
    assert_eq!(image.function(1).unwrap().line, 4);
}

#[test]
fn test_image_instructions() {
    let image = BytecodeImage::from_bytes(two_function_image().to_bytes()).unwrap();
    let insts = image.instructions(0).unwrap();

    assert_eq!(insts.len(), 4);
    assert_eq!(insts[0].operands[1], Operand::FunctionId(1));
    assert!(matches!(
        image.instructions(7),
        Err(ImageError::InvalidFunctionId(7))
    ));
}

#[test]
fn test_image_section_order() {
    let image = BytecodeImage::from_bytes(two_function_image().to_bytes()).unwrap();
    let order: Vec<&str> = image.sections().iter().map(|s| s.name).collect();

    assert_eq!(
        order,
        vec![
            names::HEADER,
            names::STRING_TABLE,
            names::FILENAME_TABLE,
            names::FUNCTION_HEADERS,
            names::FUNCTION_BODIES,
            names::EPILOGUE,
        ]
    );
    let bodies = image.section(names::FUNCTION_BODIES).unwrap();
    assert_eq!(bodies.start(), image.function(0).unwrap().offset as usize);
    assert!(image.epilogue().is_empty());
}

#[test]
fn test_image_rejects_out_of_bounds_body() {
    let mut bytes = two_function_image().to_bytes();
    let image = BytecodeImage::from_bytes(bytes.clone()).unwrap();
    let headers = image.section(names::FUNCTION_HEADERS).unwrap().start();

    // Size field of function 0 is the last word of its header record
    let size_at = headers + 28;
    bytes[size_at..size_at + 4].copy_from_slice(&0xffffu32.to_le_bytes());

    assert!(matches!(
        BytecodeImage::from_bytes(bytes),
        Err(ImageError::FunctionOutOfBounds { function: 0, .. })
    ));
}

#[test]
fn test_image_rejects_invalid_utf8() {
    let mut builder = ImageBuilder::new();
    builder.add_string("ab");
    let mut bytes = builder.to_bytes();
    let at = bytecode_image::image::HEADER_SIZE + 4;
    bytes[at] = 0xff;

    assert_eq!(
        BytecodeImage::from_bytes(bytes).unwrap_err(),
        ImageError::InvalidUtf8 {
            section: names::STRING_TABLE,
            index: 0
        }
    );
}

#[test]
fn test_image_rejects_bad_global_function() {
    let mut builder = two_function_image();
    builder.set_global_function(5);

    assert_eq!(
        BytecodeImage::from_bytes(builder.to_bytes()).unwrap_err(),
        ImageError::InvalidGlobalFunction(5)
    );
}
