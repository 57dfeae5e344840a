//! Command line arguments

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use profile_analyzer::AnalysisMode;

/// Long options also accepted with a single leading dash
const SINGLE_DASH_LONG: &[&str] = &[
    "out",
    "mode",
    "profile-file",
    "pretty-disassemble",
    "show-section-ranges",
    "human",
];

/// Bytecode image dump tool
#[derive(Parser, Debug, Clone)]
#[command(name = "bcdump", version, about = "Bytecode image dump tool")]
pub struct Cli {
    /// Bytecode image to inspect
    pub input: PathBuf,

    /// Output file name (default: stdout)
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Semicolon-separated commands to run before the interactive prompt
    #[arg(short = 'c', value_name = "CMDS")]
    pub commands: Option<String>,

    /// Pretty print the disassembled bytecode
    #[arg(
        long,
        value_name = "BOOL",
        default_value_t = true,
        default_missing_value = "true",
        num_args = 0..=1,
        require_equals = true,
        action = ArgAction::Set
    )]
    pub pretty_disassemble: bool,

    /// How functions are ranked: instruction or function
    #[arg(long, default_value = "instruction")]
    pub mode: AnalysisMode,

    /// JSON basic block profile trace
    #[arg(long, value_name = "PATH")]
    pub profile_file: Option<PathBuf>,

    /// Print the byte range of each section and exit
    #[arg(long)]
    pub show_section_ranges: bool,

    /// Print section ranges in decimal with sizes instead of hex
    #[arg(long)]
    pub human: bool,
}

impl Cli {
    /// Startup commands from `-c`, split on `;`
    pub fn startup_commands(&self) -> Vec<String> {
        self.commands
            .as_deref()
            .map(|cmds| {
                cmds.split(';')
                    .filter(|cmd| !cmd.trim().is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Rewrite `-out`, `-mode=...` and friends to their `--` spelling
///
/// Arguments after a bare `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg: OsString| {
            if passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split('=').next().unwrap_or(rest);
                    if SINGLE_DASH_LONG.contains(&name) {
                        OsString::from(format!("-{}", text))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}
