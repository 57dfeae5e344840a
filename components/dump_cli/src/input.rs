//! Line sources for the interactive session

use std::io::{self, BufRead, ErrorKind, Write};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Source of command lines
pub trait LineReader {
    /// Show `prompt` and read one line without its terminator
    ///
    /// Returns `Ok(None)` at end of input.
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> CliResult<Option<String>>;
}

/// Reads lines from any buffered reader, writing the prompt to the output sink
pub struct BufReadLines<R> {
    reader: R,
}

impl<R: BufRead> BufReadLines<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> BufReadLines<R> {
    /// Read raw bytes up to and including the next `\n`
    ///
    /// `fill_buf` surfaces `Interrupted` from the underlying reader, so the
    /// retry happens here.
    fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let mut line = Vec::new();
        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == ErrorKind::Interrupted => {
                    debug!("read interrupted, retrying");
                    continue;
                }
                Err(err) => return Err(err),
            };
            if available.is_empty() {
                return Ok((!line.is_empty()).then_some(line));
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    line.extend_from_slice(&available[..=pos]);
                    self.reader.consume(pos + 1);
                    return Ok(Some(line));
                }
                None => {
                    let len = available.len();
                    line.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }
    }
}

impl<R: BufRead> LineReader for BufReadLines<R> {
    /// Invalid UTF-8 is replaced with U+FFFD so a garbled line reaches the
    /// interpreter as an unknown command instead of ending the session.
    fn read_line(&mut self, prompt: &str, out: &mut dyn Write) -> CliResult<Option<String>> {
        out.write_all(prompt.as_bytes())?;
        out.flush()?;

        let Some(mut bytes) = self.next_line().map_err(CliError::Io)? else {
            return Ok(None);
        };
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }
}

/// Reads lines from the terminal with line editing and history
pub struct EditorLines {
    editor: DefaultEditor,
}

impl EditorLines {
    /// Create a line editor on the controlling terminal
    pub fn new() -> CliResult<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl LineReader for EditorLines {
    fn read_line(&mut self, prompt: &str, _out: &mut dyn Write) -> CliResult<Option<String>> {
        loop {
            match self.editor.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }
                    return Ok(Some(line));
                }
                // Ctrl-C abandons the current line only
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => return Err(CliError::Readline(err)),
            }
        }
    }
}
