//! Function ranking mode

use std::fmt;
use std::str::FromStr;

/// How function statistics are ranked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// Rank by number of executed instructions
    #[default]
    Instruction,
    /// Rank by number of entries (executions of the entry block)
    Function,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Instruction => write!(f, "instruction"),
            AnalysisMode::Function => write!(f, "function"),
        }
    }
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "instruction" => Ok(AnalysisMode::Instruction),
            "function" => Ok(AnalysisMode::Function),
            other => Err(format!(
                "unknown analysis mode '{}' (expected 'instruction' or 'function')",
                other
            )),
        }
    }
}
