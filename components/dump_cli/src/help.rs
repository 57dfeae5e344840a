//! Built-in help text for interactive commands

use std::io::{self, Write};

/// Banner printed before the command listing
pub const TOP_LEVEL: &str = "These commands are defined internally. Type `help' to see this list.\n\
Type `help name' to find out more about the function `name'.\n\n";

/// Help text per canonical command name, sorted by name
const ENTRIES: &[(&str, &str)] = &[
    (
        "at-virtual",
        "Display information about the function at a given virtual offset.\n\
Add the '-json' flag to print the record as JSON.\n\n\
USAGE: at-virtual <OFFSET> [-json]\n       at_virtual <OFFSET> [-json]\n",
    ),
    (
        "block",
        "Display top hot basic blocks in sorted order.\n\n\
USAGE: block\n",
    ),
    (
        "disassemble",
        "'disassemble': Display bytecode disassembled output of whole binary.\n\
'disassemble <FUNC_ID>': Display bytecode disassembled output of function with id <FUNC_ID>.\n\
Add the '-offsets' flag to show virtual offsets for all instructions.\n\n\
USAGE: disassemble <FUNC_ID> [-offsets]\n       dis <FUNC_ID> [-offsets]\n",
    ),
    (
        "epilogue",
        "Display the size and contents of the bytes following the function bodies.\n\n\
USAGE: epilogue\n       epi\n",
    ),
    (
        "filename",
        "Display the filename table entry with id <FILENAME_ID>.\n\n\
USAGE: filename <FILENAME_ID>\n",
    ),
    (
        "function",
        "'function': Compute the runtime instruction frequency for each function and display in descending order.\n\
Each function name is displayed together with its source location.\n\
'function <FUNC_ID>': Dump basic block stats for function with id <FUNC_ID>.\n\n\
USAGE: function [FUNC_ID]\n       fun [FUNC_ID]\n",
    ),
    (
        "help",
        "Help instructions for bcdump tool commands.\n\n\
USAGE: help <COMMAND>\n       h <COMMAND>\n",
    ),
    (
        "instruction",
        "Computes the runtime instruction frequency for each instruction and displays it in descending order.\n\n\
USAGE: instruction\n       inst\n",
    ),
    (
        "io",
        "Visualize function page I/O access working set in basic block profile trace.\n\n\
USAGE: io\n",
    ),
    (
        "offsets",
        "'offsets': Display the virtual offset and size of every function.\n\
'offsets <FUNC_ID>': Display the virtual offset and size of function with id <FUNC_ID>.\n\
Add the '-json' flag to print the records as JSON.\n\n\
USAGE: offsets [FUNC_ID] [-json]\n       offset [FUNC_ID] [-json]\n",
    ),
    (
        "quit",
        "Leave the interactive session.\n\n\
USAGE: quit\n",
    ),
    (
        "string",
        "Display the string table entry with id <STRING_ID>.\n\n\
USAGE: string <STRING_ID>\n       str <STRING_ID>\n",
    ),
    (
        "summary",
        "Display overall summary information.\n\n\
USAGE: summary\n       sum\n",
    ),
];

/// Static registry of command help
pub struct HelpRegistry;

impl HelpRegistry {
    /// Help text for a canonical command name
    pub fn lookup(name: &str) -> Option<&'static str> {
        ENTRIES
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, text)| *text)
    }

    /// Registered command names in listing order
    pub fn names() -> impl Iterator<Item = &'static str> {
        ENTRIES.iter().map(|(name, _)| *name)
    }

    /// Write the banner followed by every command name
    pub fn write_list(out: &mut dyn Write) -> io::Result<()> {
        out.write_all(TOP_LEVEL.as_bytes())?;
        for name in Self::names() {
            writeln!(out, "{}", name)?;
        }
        Ok(())
    }

    /// Write the help for one command, or `Invalid command: <name>`
    pub fn write_command(name: &str, out: &mut dyn Write) -> io::Result<()> {
        match Self::lookup(name) {
            Some(text) => out.write_all(text.as_bytes()),
            None => writeln!(out, "Invalid command: {}", name),
        }
    }
}
