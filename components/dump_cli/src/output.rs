//! Per-command structured output selection

use std::io::Write;

use profile_analyzer::{create_printer, OutputFormat, StructuredPrinter};

use crate::command::{Command, JSON_FLAG};

/// Picks text or JSON output for a single command invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSelector {
    format: OutputFormat,
}

impl OutputSelector {
    /// Consume a `-json` flag from the command, if present
    pub fn from_command(command: &mut Command<'_>) -> Self {
        Self {
            format: OutputFormat::from_json_flag(command.take_flag(JSON_FLAG)),
        }
    }

    /// The selected format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Create a printer bound to the output sink
    pub fn printer<'a>(&self, out: &'a mut dyn Write) -> Box<dyn StructuredPrinter + 'a> {
        create_printer(out, self.format)
    }
}
