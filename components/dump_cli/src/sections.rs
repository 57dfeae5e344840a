//! One-shot section range report

use std::io::{self, Write};

use bytecode_image::BytecodeImage;

/// Prints the byte range of every section of an image
pub struct SectionRangeReporter<'a> {
    image: &'a BytecodeImage,
}

impl<'a> SectionRangeReporter<'a> {
    /// Create a reporter for an image
    pub fn new(image: &'a BytecodeImage) -> Self {
        Self { image }
    }

    /// Write one line per section in file order
    ///
    /// Ranges are hexadecimal unless `human` is set, in which case they are
    /// decimal and followed by the section size.
    pub fn report(&self, human: bool, out: &mut dyn Write) -> io::Result<()> {
        for section in self.image.sections() {
            if human {
                writeln!(
                    out,
                    "{:<16} [{}, {})  {}",
                    section.name,
                    section.start(),
                    section.end(),
                    humanize(section.size())
                )?;
            } else {
                writeln!(
                    out,
                    "{:<16} [0x{:08x}, 0x{:08x})",
                    section.name,
                    section.start(),
                    section.end()
                )?;
            }
        }
        Ok(())
    }
}

fn humanize(size: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * KIB;
    if size < KIB {
        format!("{} B", size)
    } else if size < MIB {
        format!("{:.2} KiB", size as f64 / KIB as f64)
    } else {
        format!("{:.2} MiB", size as f64 / MIB as f64)
    }
}
