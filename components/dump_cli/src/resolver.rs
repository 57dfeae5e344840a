//! Virtual offset to function resolution

use std::io::Write;

use profile_analyzer::{AnalyzerResult, ProfileAnalyzer};

use crate::output::OutputSelector;

/// Maps absolute file offsets to the function whose body contains them
pub struct VirtualOffsetResolver<'a> {
    analyzer: &'a ProfileAnalyzer,
}

impl<'a> VirtualOffsetResolver<'a> {
    /// Create a resolver backed by an analyzer
    pub fn new(analyzer: &'a ProfileAnalyzer) -> Self {
        Self { analyzer }
    }

    /// Id of the function containing `offset`
    pub fn resolve(&self, offset: u32) -> Option<u32> {
        self.analyzer.function_from_virtual_offset(offset)
    }

    /// Dump the offsets of the function containing `offset`
    ///
    /// Returns `false` after writing `Virtual offset <N> is invalid.` when no
    /// function contains the offset.
    pub fn dump(
        &self,
        offset: u32,
        selector: OutputSelector,
        out: &mut dyn Write,
    ) -> AnalyzerResult<bool> {
        match self.resolve(offset) {
            Some(id) => {
                let mut printer = selector.printer(out);
                self.analyzer.dump_function_offsets(id, printer.as_mut())?;
                Ok(true)
            }
            None => {
                writeln!(out, "Virtual offset {} is invalid.", offset)?;
                Ok(false)
            }
        }
    }
}
