//! Bytecode dump tool library
//!
//! Provides the command interpreter, session driver and process bootstrap
//! behind the `bcdump` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bootstrap;
pub mod cli;
pub mod command;
pub mod error;
pub mod help;
pub mod input;
pub mod interpreter;
pub mod options;
pub mod output;
pub mod resolver;
pub mod sections;
pub mod session;

pub use cli::Cli;
pub use error::{CliError, CliResult};
pub use interpreter::{CommandInterpreter, Flow};
pub use session::{SessionDriver, SessionEnd};
