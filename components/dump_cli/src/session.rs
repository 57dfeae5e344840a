//! Startup commands and the interactive loop

use std::io::Write;

use tracing::{debug, info};

use crate::error::CliResult;
use crate::input::LineReader;
use crate::interpreter::{CommandInterpreter, Flow};

/// Prompt shown before every interactive command
pub const PROMPT: &str = "bcdump> ";

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// A command asked to quit
    Terminated,
    /// The line source was exhausted
    EndOfInput,
}

/// Runs startup commands, then reads and executes commands until done
pub struct SessionDriver {
    interpreter: CommandInterpreter,
    startup: Vec<String>,
}

impl SessionDriver {
    /// Create a driver that runs `startup` before prompting
    pub fn new(interpreter: CommandInterpreter, startup: Vec<String>) -> Self {
        Self {
            interpreter,
            startup,
        }
    }

    /// The interpreter executing commands
    pub fn interpreter(&self) -> &CommandInterpreter {
        &self.interpreter
    }

    /// Run the session to completion
    ///
    /// A `quit` among the startup commands ends the session before any
    /// later startup command runs and before the first prompt.
    pub fn run(
        &mut self,
        input: &mut dyn LineReader,
        out: &mut dyn Write,
    ) -> CliResult<SessionEnd> {
        for command in &self.startup {
            debug!(command = command.as_str(), "startup command");
            if self.interpreter.execute(command, out)? == Flow::Terminate {
                out.flush()?;
                return Ok(SessionEnd::Terminated);
            }
        }

        let end = loop {
            let Some(line) = input.read_line(PROMPT, out)? else {
                break SessionEnd::EndOfInput;
            };
            if self.interpreter.execute(&line, out)? == Flow::Terminate {
                break SessionEnd::Terminated;
            }
        };
        out.flush()?;
        info!(?end, "session finished");
        Ok(end)
    }
}
