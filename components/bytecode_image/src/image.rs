//! Decoded bytecode image
//!
//! Holds the raw file buffer together with the decoded string, filename and
//! function tables and the byte range of every section.

use crate::error::{ImageError, ImageResult};
use crate::instruction::{decode_all, Instruction};
use crate::section::{names, Section};

/// Magic number at the start of every image
pub const MAGIC: [u8; 4] = *b"BCIM";

/// Format version written and accepted by this crate
pub const VERSION: u8 = 1;

/// Size of the fixed header in bytes
pub const HEADER_SIZE: usize = 25;

/// Size of one function header record in bytes
pub const FUNCTION_HEADER_SIZE: usize = 32;

/// Per-function metadata from the function header table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionHeader {
    /// String table index of the function name
    pub name_id: u32,
    /// Filename table index of the defining source file
    pub filename_id: u32,
    /// Source line of the definition
    pub line: u32,
    /// Source column of the definition
    pub column: u32,
    /// Number of declared parameters
    pub param_count: u32,
    /// Number of registers in the frame
    pub frame_size: u32,
    /// Absolute file offset of the first bytecode byte
    pub offset: u32,
    /// Size of the bytecode body in bytes
    pub size: u32,
}

impl FunctionHeader {
    /// Absolute offset one past the last bytecode byte
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.size)
    }

    /// Check whether an absolute file offset falls inside this body
    pub fn contains(&self, virtual_offset: u32) -> bool {
        virtual_offset >= self.offset && u64::from(virtual_offset) < self.end()
    }
}

/// A decoded bytecode image
#[derive(Debug, Clone)]
pub struct BytecodeImage {
    bytes: Vec<u8>,
    global_function: u32,
    strings: Vec<String>,
    filenames: Vec<String>,
    functions: Vec<FunctionHeader>,
    sections: Vec<Section>,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    section: &'static str,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8], pos: usize, section: &'static str) -> Self {
        Self {
            bytes,
            pos,
            section,
        }
    }

    fn take(&mut self, len: usize) -> ImageResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(ImageError::Truncated {
                section: self.section,
                offset: self.pos,
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> ImageResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self) -> ImageResult<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn string_table(&mut self, count: u32) -> ImageResult<Vec<String>> {
        let mut entries = Vec::with_capacity(count.min(1 << 16) as usize);
        for index in 0..count {
            let len = self.u32()? as usize;
            let raw = self.take(len)?;
            let text = std::str::from_utf8(raw).map_err(|_| ImageError::InvalidUtf8 {
                section: self.section,
                index,
            })?;
            entries.push(text.to_string());
        }
        Ok(entries)
    }
}

impl BytecodeImage {
    /// Decode an image from its file contents
    ///
    /// # Errors
    /// Returns `ImageError` when the magic, version or any table is invalid,
    /// or when a function body lies outside the function bodies section.
    ///
    /// # Example
    /// ```
    /// use bytecode_image::{BytecodeImage, ImageBuilder};
    ///
    /// let bytes = ImageBuilder::new().to_bytes();
    /// let image = BytecodeImage::from_bytes(bytes).unwrap();
    /// assert_eq!(image.function_count(), 0);
    /// ```
    pub fn from_bytes(bytes: Vec<u8>) -> ImageResult<Self> {
        let mut header = Reader::new(&bytes, 0, names::HEADER);
        if header.take(4)? != MAGIC {
            return Err(ImageError::BadMagic);
        }
        let version = header.u8()?;
        if version != VERSION {
            return Err(ImageError::UnsupportedVersion(version));
        }
        let global_function = header.u32()?;
        let function_count = header.u32()?;
        let string_count = header.u32()?;
        let filename_count = header.u32()?;
        let bodies_size = header.u32()? as usize;
        let mut sections = vec![Section::new(names::HEADER, 0, header.pos)];

        let mut reader = Reader::new(&bytes, header.pos, names::STRING_TABLE);
        let strings = reader.string_table(string_count)?;
        sections.push(Section::new(names::STRING_TABLE, header.pos, reader.pos));

        let start = reader.pos;
        reader.section = names::FILENAME_TABLE;
        let filenames = reader.string_table(filename_count)?;
        sections.push(Section::new(names::FILENAME_TABLE, start, reader.pos));

        let start = reader.pos;
        reader.section = names::FUNCTION_HEADERS;
        let mut functions = Vec::with_capacity(function_count.min(1 << 16) as usize);
        for _ in 0..function_count {
            functions.push(FunctionHeader {
                name_id: reader.u32()?,
                filename_id: reader.u32()?,
                line: reader.u32()?,
                column: reader.u32()?,
                param_count: reader.u32()?,
                frame_size: reader.u32()?,
                offset: reader.u32()?,
                size: reader.u32()?,
            });
        }
        sections.push(Section::new(names::FUNCTION_HEADERS, start, reader.pos));

        let bodies_start = reader.pos;
        reader.section = names::FUNCTION_BODIES;
        reader.take(bodies_size)?;
        let bodies_end = reader.pos;
        sections.push(Section::new(names::FUNCTION_BODIES, bodies_start, bodies_end));
        sections.push(Section::new(names::EPILOGUE, bodies_end, bytes.len()));

        for (id, function) in functions.iter().enumerate() {
            if (function.offset as usize) < bodies_start || function.end() > bodies_end as u64 {
                return Err(ImageError::FunctionOutOfBounds {
                    function: id as u32,
                    start: u64::from(function.offset),
                    end: function.end(),
                });
            }
        }
        if !functions.is_empty() && global_function as usize >= functions.len() {
            return Err(ImageError::InvalidGlobalFunction(global_function));
        }

        Ok(Self {
            bytes,
            global_function,
            strings,
            filenames,
            functions,
            sections,
        })
    }

    /// Total size of the image file in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the image file is empty (never true for a decoded image)
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw file contents
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Id of the top-level function
    pub fn global_function_id(&self) -> u32 {
        self.global_function
    }

    /// Number of functions
    pub fn function_count(&self) -> u32 {
        self.functions.len() as u32
    }

    /// All function headers, indexed by function id
    pub fn functions(&self) -> &[FunctionHeader] {
        &self.functions
    }

    /// Header of one function
    pub fn function(&self, id: u32) -> Option<&FunctionHeader> {
        self.functions.get(id as usize)
    }

    /// Name of a function, or `<unknown>` when its name id is out of range
    pub fn function_name(&self, id: u32) -> &str {
        self.function(id)
            .and_then(|f| self.string(f.name_id))
            .unwrap_or("<unknown>")
    }

    /// String table entries
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// One string table entry
    pub fn string(&self, id: u32) -> Option<&str> {
        self.strings.get(id as usize).map(String::as_str)
    }

    /// Filename table entries
    pub fn filenames(&self) -> &[String] {
        &self.filenames
    }

    /// One filename table entry
    pub fn filename(&self, id: u32) -> Option<&str> {
        self.filenames.get(id as usize).map(String::as_str)
    }

    /// Raw bytecode of one function
    pub fn bytecode(&self, id: u32) -> ImageResult<&[u8]> {
        let f = self.function(id).ok_or(ImageError::InvalidFunctionId(id))?;
        Ok(&self.bytes[f.offset as usize..f.end() as usize])
    }

    /// Decoded instructions of one function
    pub fn instructions(&self, id: u32) -> ImageResult<Vec<Instruction>> {
        decode_all(self.bytecode(id)?)
    }

    /// Sections in file order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Look up a section by name
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Trailing bytes after the function bodies
    pub fn epilogue(&self) -> &[u8] {
        self.section(names::EPILOGUE)
            .map(|s| &self.bytes[s.range.clone()])
            .unwrap_or(&[])
    }

    /// Id of the function whose body contains an absolute file offset
    ///
    /// When bodies overlap the lowest function id wins.
    pub fn function_at_offset(&self, virtual_offset: u32) -> Option<u32> {
        self.functions
            .iter()
            .position(|f| f.contains(virtual_offset))
            .map(|id| id as u32)
    }
}
