//! Profile trace format
//!
//! A trace is a JSON document recorded by the VM's basic block profiler:
//!
//! ```json
//! {
//!   "blocks": [{ "function": 1, "offset": 0, "count": 12 }],
//!   "trace": [{ "function": 1, "offset": 0 }]
//! }
//! ```
//!
//! `blocks` holds the execution count of the basic block starting at a
//! function-relative offset; `trace` is the ordered sequence of block
//! visits. Both arrays are optional.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// Execution count of one basic block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockCount {
    /// Function id
    pub function: u32,
    /// Function-relative offset of the block's first instruction
    pub offset: u32,
    /// Number of times the block executed
    pub count: u64,
}

/// One entry in the ordered visit sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockVisit {
    /// Function id
    pub function: u32,
    /// Function-relative offset of the visited block
    pub offset: u32,
}

/// A recorded execution profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileTrace {
    /// Per-block execution counts
    #[serde(default)]
    pub blocks: Vec<BlockCount>,
    /// Ordered block visits
    #[serde(default)]
    pub trace: Vec<BlockVisit>,
}

impl ProfileTrace {
    /// Parse a trace from JSON text
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a trace from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ProfileError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Export the trace as JSON
    pub fn to_json(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total executions recorded across all blocks
    pub fn total_block_executions(&self) -> u64 {
        self.blocks.iter().map(|b| b.count).sum()
    }
}
