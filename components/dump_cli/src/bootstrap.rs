//! Process startup: load inputs, then run the requested mode

use std::fs::{self, File};
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;

use bytecode_image::BytecodeImage;
use profile_analyzer::{ProfileError, ProfileTrace};
use tracing::info;

use crate::cli::Cli;
use crate::error::{CliError, CliResult};
use crate::input::{BufReadLines, EditorLines, LineReader};
use crate::interpreter::CommandInterpreter;
use crate::sections::SectionRangeReporter;
use crate::session::SessionDriver;

/// Run the tool with input from stdin
///
/// The line editor is used when both stdin and stdout are terminals and no
/// output file was given.
pub fn run(cli: &Cli) -> CliResult<()> {
    let interactive = cli.out.is_none() && io::stdin().is_terminal() && io::stdout().is_terminal();
    run_with_input(cli, || -> CliResult<Box<dyn LineReader>> {
        if interactive {
            Ok(Box::new(EditorLines::new()?))
        } else {
            Ok(Box::new(BufReadLines::new(io::stdin().lock())))
        }
    })
}

/// Run the tool, creating the line source only if a session is started
pub fn run_with_input<F>(cli: &Cli, input: F) -> CliResult<()>
where
    F: FnOnce() -> CliResult<Box<dyn LineReader>>,
{
    let image = Arc::new(load_image(&cli.input)?);
    let mut out = open_output(cli.out.as_deref())?;
    let profile = cli.profile_file.as_deref().map(load_profile).transpose()?;

    if profile.is_none() && cli.show_section_ranges {
        SectionRangeReporter::new(&image).report(cli.human, &mut out)?;
        out.flush()?;
        return Ok(());
    }

    let interpreter =
        CommandInterpreter::for_image(image, profile, cli.mode, cli.pretty_disassemble);
    let mut driver = SessionDriver::new(interpreter, cli.startup_commands());
    let mut reader = input()?;
    driver.run(reader.as_mut(), &mut out)?;
    Ok(())
}

/// Read and decode a bytecode image file
pub fn load_image(path: &Path) -> CliResult<BytecodeImage> {
    let bytes = fs::read(path).map_err(|source| CliError::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;
    let image = BytecodeImage::from_bytes(bytes).map_err(|source| CliError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        functions = image.function_count(),
        bytes = image.len(),
        "loaded bytecode image"
    );
    Ok(image)
}

/// Read and parse a JSON profile trace
pub fn load_profile(path: &Path) -> CliResult<ProfileTrace> {
    let to_error = |source: ProfileError| CliError::Profile {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(|err| to_error(err.into()))?;
    let trace = ProfileTrace::from_reader(io::BufReader::new(file)).map_err(to_error)?;
    info!(
        path = %path.display(),
        blocks = trace.blocks.len(),
        visits = trace.trace.len(),
        "loaded profile trace"
    );
    Ok(trace)
}

fn open_output(path: Option<&Path>) -> CliResult<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|source| CliError::OpenOutput {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}
