//! Byte ranges of the sections making up an image file

use std::ops::Range;

/// A named, contiguous byte range within an image file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Section name as shown by range reports
    pub name: &'static str,
    /// Absolute byte range within the file
    pub range: Range<usize>,
}

impl Section {
    /// Create a section covering `start..end`
    pub fn new(name: &'static str, start: usize, end: usize) -> Self {
        Self {
            name,
            range: start..end,
        }
    }

    /// Absolute offset of the first byte
    pub fn start(&self) -> usize {
        self.range.start
    }

    /// Absolute offset one past the last byte
    pub fn end(&self) -> usize {
        self.range.end
    }

    /// Number of bytes in the section
    pub fn size(&self) -> usize {
        self.range.len()
    }
}

/// Section names in file order
pub mod names {
    /// Fixed-size file header
    pub const HEADER: &str = "header";
    /// String table
    pub const STRING_TABLE: &str = "string_table";
    /// Filename table
    pub const FILENAME_TABLE: &str = "filename_table";
    /// Function header table
    pub const FUNCTION_HEADERS: &str = "function_headers";
    /// Concatenated function bodies
    pub const FUNCTION_BODIES: &str = "function_bodies";
    /// Trailing bytes after the function bodies
    pub const EPILOGUE: &str = "epilogue";
}
