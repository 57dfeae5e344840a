//! Interactive command dispatch

use std::io::Write;
use std::sync::Arc;

use bytecode_image::BytecodeImage;
use disassembler::{DisassembleError, DisassembleResult, Disassembler, RenderOptions};
use profile_analyzer::{AnalysisMode, AnalyzerError, AnalyzerResult, ProfileAnalyzer, ProfileTrace};
use tracing::debug;

use crate::command::{parse, parse_integer, Command, ParsedLine, Verb, OFFSETS_FLAG};
use crate::error::{CliError, CliResult};
use crate::help::HelpRegistry;
use crate::options::OptionScope;
use crate::output::OutputSelector;
use crate::resolver::VirtualOffsetResolver;

/// What the session should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next command
    Continue,
    /// End the session
    Terminate,
}

/// How a handler finished
enum Step {
    /// Output complete, follow it with a blank line
    Done,
    /// Returned early, no separator
    Early,
    /// Quit requested
    Terminate,
}

/// Executes interactive commands against a disassembler and an analyzer
pub struct CommandInterpreter {
    disassembler: Disassembler,
    analyzer: ProfileAnalyzer,
}

impl CommandInterpreter {
    /// Create an interpreter from its collaborators
    pub fn new(disassembler: Disassembler, analyzer: ProfileAnalyzer) -> Self {
        Self {
            disassembler,
            analyzer,
        }
    }

    /// Create an interpreter with the session baseline render options
    pub fn for_image(
        image: Arc<BytecodeImage>,
        profile: Option<ProfileTrace>,
        mode: AnalysisMode,
        pretty: bool,
    ) -> Self {
        let mut disassembler = Disassembler::new(Arc::clone(&image));
        disassembler.set_options(RenderOptions::baseline(pretty));
        let analyzer = ProfileAnalyzer::new(image, profile, mode);
        Self::new(disassembler, analyzer)
    }

    /// The disassembler and its current options
    pub fn disassembler(&self) -> &Disassembler {
        &self.disassembler
    }

    /// The profile analyzer
    pub fn analyzer(&self) -> &ProfileAnalyzer {
        &self.analyzer
    }

    /// Execute one input line
    ///
    /// Command errors such as an out-of-range id are written to `out` and
    /// the session continues. Failures writing to `out` are returned.
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> CliResult<Flow> {
        let mut command = match parse(line) {
            ParsedLine::Empty => return Ok(Flow::Continue),
            ParsedLine::Unknown(verb) => {
                debug!(verb, "unknown command");
                HelpRegistry::write_command(verb, out)?;
                return Ok(Flow::Continue);
            }
            ParsedLine::Command(command) => command,
        };
        debug!(verb = command.verb.name(), args = ?command.args, "executing command");

        let step = match command.verb {
            Verb::Function => self.function(&command, out)?,
            Verb::Instruction => {
                self.no_args(&command, out, |a, out| a.dump_instruction_stats(out))?
            }
            Verb::Disassemble => self.disassemble(&mut command, out)?,
            Verb::AtVirtual => self.at_virtual(&mut command, out)?,
            Verb::Help => help(&command, out)?,
            Verb::Epilogue => self.no_args(&command, out, |a, out| a.dump_epilogue(out))?,
            Verb::Block => self.no_args(&command, out, |a, out| a.dump_basic_block_stats(out))?,
            Verb::Summary => self.no_args(&command, out, |a, out| a.dump_summary(out))?,
            Verb::Io => self.no_args(&command, out, |a, out| a.dump_io(out))?,
            Verb::String => {
                self.table_entry(&command, "string_id", out, ProfileAnalyzer::dump_string)?
            }
            Verb::Filename => {
                self.table_entry(&command, "filename_id", out, ProfileAnalyzer::dump_file_name)?
            }
            Verb::Offsets => self.offsets(&mut command, out)?,
            Verb::Quit if command.args.is_empty() => Step::Terminate,
            Verb::Quit => show_help(Verb::Quit, out)?,
        };

        match step {
            Step::Done => {
                writeln!(out)?;
                Ok(Flow::Continue)
            }
            Step::Early => Ok(Flow::Continue),
            Step::Terminate => Ok(Flow::Terminate),
        }
    }

    fn function(&self, command: &Command<'_>, out: &mut dyn Write) -> CliResult<Step> {
        match command.args.as_slice() {
            [] => analysis(self.analyzer.dump_function_stats(out), out),
            [id] => match parse_integer(id) {
                Some(id) => analysis(self.analyzer.dump_function_basic_block_stats(id, out), out),
                None => parse_error("func_id", out),
            },
            _ => show_help(command.verb, out),
        }
    }

    fn no_args(
        &self,
        command: &Command<'_>,
        out: &mut dyn Write,
        dump: impl FnOnce(&ProfileAnalyzer, &mut dyn Write) -> AnalyzerResult<()>,
    ) -> CliResult<Step> {
        if !command.args.is_empty() {
            return show_help(command.verb, out);
        }
        analysis(dump(&self.analyzer, out), out)
    }

    fn table_entry(
        &self,
        command: &Command<'_>,
        what: &str,
        out: &mut dyn Write,
        dump: fn(&ProfileAnalyzer, u32, &mut dyn Write) -> AnalyzerResult<()>,
    ) -> CliResult<Step> {
        let [id] = command.args.as_slice() else {
            return show_help(command.verb, out);
        };
        match parse_integer(id) {
            Some(id) => analysis(dump(&self.analyzer, id, out), out),
            None => parse_error(what, out),
        }
    }

    fn disassemble(&mut self, command: &mut Command<'_>, out: &mut dyn Write) -> CliResult<Step> {
        let addition = if command.take_flag(OFFSETS_FLAG) {
            RenderOptions::INCLUDE_VIRTUAL_OFFSETS
        } else {
            RenderOptions::NONE
        };
        OptionScope::run(&mut self.disassembler, addition, |scoped| {
            match command.args.as_slice() {
                [] => disassembly(scoped.disassemble(out), out),
                [id] => match parse_integer(id) {
                    Some(id) => disassembly(scoped.disassemble_function(id, out), out),
                    None => parse_error("func_id", out),
                },
                _ => show_help(command.verb, out),
            }
        })
    }

    fn offsets(&self, command: &mut Command<'_>, out: &mut dyn Write) -> CliResult<Step> {
        let selector = OutputSelector::from_command(command);
        let result = match command.args.as_slice() {
            [] => {
                let mut printer = selector.printer(out);
                self.analyzer.dump_all_function_offsets(printer.as_mut())
            }
            [id] => {
                let Some(id) = parse_integer(id) else {
                    return parse_error("func_id", out);
                };
                let mut printer = selector.printer(out);
                self.analyzer.dump_function_offsets(id, printer.as_mut())
            }
            _ => {
                writeln!(out, "Usage: offsets [FUNC_ID] [-json]")?;
                return Ok(Step::Early);
            }
        };
        analysis(result, out)
    }

    fn at_virtual(&self, command: &mut Command<'_>, out: &mut dyn Write) -> CliResult<Step> {
        let selector = OutputSelector::from_command(command);
        let [offset] = command.args.as_slice() else {
            return show_help(command.verb, out);
        };
        let Some(offset) = parse_integer(offset) else {
            return parse_error("virtual_offset", out);
        };
        match VirtualOffsetResolver::new(&self.analyzer).dump(offset, selector, out) {
            Ok(true) => Ok(Step::Done),
            Ok(false) => Ok(Step::Early),
            Err(err) => analysis(Err(err), out),
        }
    }
}

/// Help for exactly one named command, otherwise the full listing
fn help(command: &Command<'_>, out: &mut dyn Write) -> CliResult<Step> {
    match command.args.as_slice() {
        [name] => {
            let name = Verb::lookup(name).map(Verb::name).unwrap_or(*name);
            HelpRegistry::write_command(name, out)?;
        }
        _ => HelpRegistry::write_list(out)?,
    }
    Ok(Step::Early)
}

fn show_help(verb: Verb, out: &mut dyn Write) -> CliResult<Step> {
    HelpRegistry::write_command(verb.name(), out)?;
    Ok(Step::Early)
}

fn parse_error(what: &str, out: &mut dyn Write) -> CliResult<Step> {
    writeln!(out, "Error: cannot parse {} as integer.", what)?;
    Ok(Step::Early)
}

/// Report a recoverable analyzer error in the output, propagate sink failures
fn analysis(result: AnalyzerResult<()>, out: &mut dyn Write) -> CliResult<Step> {
    match result {
        Ok(()) => Ok(Step::Done),
        Err(AnalyzerError::Io(err)) => Err(CliError::Io(err)),
        Err(err) => {
            writeln!(out, "Error: {}", err)?;
            Ok(Step::Early)
        }
    }
}

fn disassembly(result: DisassembleResult<()>, out: &mut dyn Write) -> CliResult<Step> {
    match result {
        Ok(()) => Ok(Step::Done),
        Err(DisassembleError::Io(err)) => Err(CliError::Io(err)),
        Err(err) => {
            writeln!(out, "Error: {}", err)?;
            Ok(Step::Early)
        }
    }
}
