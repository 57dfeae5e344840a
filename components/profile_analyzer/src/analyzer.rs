//! Frequency statistics over a bytecode image and its profile

use std::collections::{BTreeSet, HashMap};
use std::io::Write;
use std::sync::Arc;

use bytecode_image::section::names;
use bytecode_image::BytecodeImage;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::blocks::{block_containing, partition, BasicBlock};
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::mode::AnalysisMode;
use crate::printer::StructuredPrinter;
use crate::trace::ProfileTrace;

/// Page size used by the I/O working set report
pub const PAGE_SIZE: u32 = 4096;

/// Number of blocks listed by the hot block report
pub const TOP_BLOCKS: usize = 20;

const NO_PROFILE: &str = "No profile trace loaded.";

/// Basic blocks of one function with their execution counts
#[derive(Debug, Clone, Default)]
struct FunctionIndex {
    blocks: Vec<BasicBlock>,
    counts: Vec<u64>,
}

impl FunctionIndex {
    fn executed_instructions(&self) -> u64 {
        self.blocks
            .iter()
            .zip(&self.counts)
            .map(|(block, count)| count.saturating_mul(block.instruction_count() as u64))
            .fold(0u64, u64::saturating_add)
    }

    fn entries(&self) -> u64 {
        match self.blocks.first() {
            Some(block) if block.start == 0 => self.counts[0],
            _ => 0,
        }
    }

    fn executed_blocks(&self) -> usize {
        self.counts.iter().filter(|c| **c > 0).count()
    }
}

/// Computes and prints statistics for an image and an optional profile
#[derive(Debug)]
pub struct ProfileAnalyzer {
    image: Arc<BytecodeImage>,
    profile: Option<ProfileTrace>,
    mode: AnalysisMode,
    functions: Vec<FunctionIndex>,
}

impl ProfileAnalyzer {
    /// Index every function's basic blocks and attribute profile counts
    ///
    /// Profile records naming unknown functions, offsets outside a function
    /// body, or offsets that do not start a basic block are skipped with a
    /// warning.
    pub fn new(
        image: Arc<BytecodeImage>,
        profile: Option<ProfileTrace>,
        mode: AnalysisMode,
    ) -> Self {
        let mut functions: Vec<FunctionIndex> = (0..image.function_count())
            .map(|id| {
                let blocks = match image.instructions(id) {
                    Ok(instructions) => partition(&instructions),
                    Err(error) => {
                        warn!(function = id, %error, "cannot decode function body");
                        Vec::new()
                    }
                };
                let counts = vec![0; blocks.len()];
                FunctionIndex { blocks, counts }
            })
            .collect();

        if let Some(trace) = &profile {
            for record in &trace.blocks {
                let Some(index) = functions.get_mut(record.function as usize) else {
                    warn!(function = record.function, "profile names unknown function");
                    continue;
                };
                let Some(block) = block_containing(&index.blocks, record.offset) else {
                    warn!(
                        function = record.function,
                        offset = record.offset,
                        "profile offset outside function body"
                    );
                    continue;
                };
                if index.blocks[block].start != record.offset {
                    warn!(
                        function = record.function,
                        offset = record.offset,
                        block_start = index.blocks[block].start,
                        "profile offset is not a basic block start"
                    );
                    continue;
                }
                index.counts[block] = index.counts[block].saturating_add(record.count);
            }
            debug!(
                records = trace.blocks.len(),
                visits = trace.trace.len(),
                "indexed profile trace"
            );
        }

        Self {
            image,
            profile,
            mode,
            functions,
        }
    }

    /// The analysed image
    pub fn image(&self) -> &Arc<BytecodeImage> {
        &self.image
    }

    /// Basic blocks of a function
    pub fn basic_blocks(&self, id: u32) -> Option<&[BasicBlock]> {
        self.functions.get(id as usize).map(|f| f.blocks.as_slice())
    }

    /// Id of the function whose body contains an absolute file offset
    pub fn function_from_virtual_offset(&self, virtual_offset: u32) -> Option<u32> {
        self.image.function_at_offset(virtual_offset)
    }

    fn require_profile(&self, out: &mut dyn Write) -> AnalyzerResult<bool> {
        if self.profile.is_none() {
            writeln!(out, "{}", NO_PROFILE)?;
            return Ok(false);
        }
        Ok(true)
    }

    fn index(&self, id: u32) -> AnalyzerResult<&FunctionIndex> {
        self.functions
            .get(id as usize)
            .ok_or(AnalyzerError::InvalidFunctionId(id))
    }

    fn label(&self, id: u32) -> String {
        format!("Function<{}>{}", self.image.function_name(id), id)
    }

    fn source(&self, id: u32) -> String {
        match self.image.function(id) {
            Some(f) => format!(
                "{}:{}:{}",
                self.image.filename(f.filename_id).unwrap_or("<unknown>"),
                f.line,
                f.column
            ),
            None => "<unknown>".to_string(),
        }
    }

    /// Rank executed functions by the analysis mode's metric
    pub fn dump_function_stats(&self, out: &mut dyn Write) -> AnalyzerResult<()> {
        if !self.require_profile(out)? {
            return Ok(());
        }

        let mut ranked: Vec<(u32, u64)> = self
            .functions
            .iter()
            .enumerate()
            .map(|(id, index)| {
                let metric = match self.mode {
                    AnalysisMode::Instruction => index.executed_instructions(),
                    AnalysisMode::Function => index.entries(),
                };
                (id as u32, metric)
            })
            .filter(|(_, metric)| *metric > 0)
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        let total: u64 = ranked.iter().map(|(_, m)| *m).sum();

        let metric_name = match self.mode {
            AnalysisMode::Instruction => "executed instructions",
            AnalysisMode::Function => "entry count",
        };
        writeln!(out, "Functions ranked by {}:", metric_name)?;
        if ranked.is_empty() {
            writeln!(out, "  No functions executed.")?;
            return Ok(());
        }
        for (id, metric) in ranked {
            writeln!(
                out,
                "{:>12}  {:>6.2}%  {}  ({})",
                metric,
                percent(metric, total),
                self.label(id),
                self.source(id)
            )?;
        }
        Ok(())
    }

    /// List the basic blocks of one function with their execution counts
    pub fn dump_function_basic_block_stats(
        &self,
        id: u32,
        out: &mut dyn Write,
    ) -> AnalyzerResult<()> {
        let index = self.index(id)?;
        if !self.require_profile(out)? {
            return Ok(());
        }

        writeln!(
            out,
            "{} ({} basic blocks, {} executed):",
            self.label(id),
            index.blocks.len(),
            index.executed_blocks()
        )?;
        for (block, count) in index.blocks.iter().zip(&index.counts) {
            writeln!(
                out,
                "  [{:#06x}, {:#06x})  {:>4} instructions  {:>12} executions",
                block.start,
                block.end,
                block.instruction_count(),
                count
            )?;
        }
        Ok(())
    }

    /// Rank opcodes by dynamic execution count
    pub fn dump_instruction_stats(&self, out: &mut dyn Write) -> AnalyzerResult<()> {
        if !self.require_profile(out)? {
            return Ok(());
        }

        let mut by_opcode: HashMap<&'static str, u64> = HashMap::new();
        for index in &self.functions {
            for (block, count) in index.blocks.iter().zip(&index.counts) {
                if *count == 0 {
                    continue;
                }
                for opcode in &block.opcodes {
                    let slot = by_opcode.entry(opcode.name()).or_default();
                    *slot = slot.saturating_add(*count);
                }
            }
        }
        let mut ranked: Vec<(&'static str, u64)> = by_opcode.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        let total: u64 = ranked.iter().map(|(_, c)| *c).sum();

        writeln!(out, "Instructions by execution count ({} executed):", total)?;
        if ranked.is_empty() {
            writeln!(out, "  No instructions executed.")?;
            return Ok(());
        }
        for (name, count) in ranked {
            writeln!(out, "{:>12}  {:>6.2}%  {}", count, percent(count, total), name)?;
        }
        Ok(())
    }

    /// List the hottest basic blocks across the whole image
    pub fn dump_basic_block_stats(&self, out: &mut dyn Write) -> AnalyzerResult<()> {
        if !self.require_profile(out)? {
            return Ok(());
        }

        let mut hot: Vec<(u32, &BasicBlock, u64)> = self
            .functions
            .iter()
            .enumerate()
            .flat_map(|(id, index)| {
                index
                    .blocks
                    .iter()
                    .zip(index.counts.iter().copied())
                    .filter(|(_, count)| *count > 0)
                    .map(move |(block, count)| (id as u32, block, count))
            })
            .collect();
        hot.sort_by(|a, b| {
            b.2.cmp(&a.2)
                .then(a.0.cmp(&b.0))
                .then(a.1.start.cmp(&b.1.start))
        });

        writeln!(
            out,
            "Hottest basic blocks (top {} of {} executed):",
            hot.len().min(TOP_BLOCKS),
            hot.len()
        )?;
        for (id, block, count) in hot.into_iter().take(TOP_BLOCKS) {
            writeln!(
                out,
                "{:>12}  {} [{:#06x}, {:#06x})  {} instructions",
                count,
                self.label(id),
                block.start,
                block.end,
                block.instruction_count()
            )?;
        }
        Ok(())
    }

    /// Print image totals and, with a profile, coverage figures
    pub fn dump_summary(&self, out: &mut dyn Write) -> AnalyzerResult<()> {
        let total_blocks: usize = self.functions.iter().map(|f| f.blocks.len()).sum();
        writeln!(
            out,
            "Image: {} bytes, {} functions, {} basic blocks",
            self.image.len(),
            self.functions.len(),
            total_blocks
        )?;
        let Some(trace) = &self.profile else {
            writeln!(out, "{}", NO_PROFILE)?;
            return Ok(());
        };

        let executed_functions = self.functions.iter().filter(|f| f.executed_blocks() > 0).count();
        let executed_blocks: usize = self
            .functions
            .iter()
            .map(FunctionIndex::executed_blocks)
            .sum();
        let executed_instructions = self
            .functions
            .iter()
            .map(FunctionIndex::executed_instructions)
            .fold(0u64, u64::saturating_add);
        writeln!(
            out,
            "Executed functions: {} of {} ({:.2}%)",
            executed_functions,
            self.functions.len(),
            percent(executed_functions as u64, self.functions.len() as u64)
        )?;
        writeln!(
            out,
            "Executed basic blocks: {} of {} ({:.2}%)",
            executed_blocks,
            total_blocks,
            percent(executed_blocks as u64, total_blocks as u64)
        )?;
        writeln!(out, "Executed instructions: {}", executed_instructions)?;
        writeln!(out, "Trace visits: {}", trace.trace.len())?;
        Ok(())
    }

    /// Print the page working set touched by the visit sequence
    ///
    /// Pages are listed in first-touch order.
    pub fn dump_io(&self, out: &mut dyn Write) -> AnalyzerResult<()> {
        let Some(trace) = &self.profile else {
            writeln!(out, "{}", NO_PROFILE)?;
            return Ok(());
        };
        if trace.trace.is_empty() {
            writeln!(out, "Profile trace has no block visits.")?;
            return Ok(());
        }

        let mut touched: BTreeSet<u32> = BTreeSet::new();
        let mut order: Vec<(u32, usize, u32)> = Vec::new();
        for (visit_no, visit) in trace.trace.iter().enumerate() {
            let Some(header) = self.image.function(visit.function) else {
                warn!(function = visit.function, "trace visits unknown function");
                continue;
            };
            if visit.offset >= header.size {
                warn!(
                    function = visit.function,
                    offset = visit.offset,
                    "trace visit outside function body"
                );
                continue;
            }
            let page = (header.offset + visit.offset) / PAGE_SIZE;
            if touched.insert(page) {
                order.push((page, visit_no, visit.function));
            }
        }

        writeln!(
            out,
            "Page working set ({}-byte pages, {} visits):",
            PAGE_SIZE,
            trace.trace.len()
        )?;
        for (page, visit_no, function) in &order {
            let start = u64::from(*page) * u64::from(PAGE_SIZE);
            writeln!(
                out,
                "  page {:>6}  [0x{:08x}, 0x{:08x})  first touch at visit {}  {}",
                page,
                start,
                start + u64::from(PAGE_SIZE),
                visit_no,
                self.label(*function)
            )?;
        }
        writeln!(
            out,
            "Distinct pages touched: {} ({} bytes)",
            order.len(),
            order.len() as u64 * u64::from(PAGE_SIZE)
        )?;
        Ok(())
    }

    /// Print the size and a hex dump of the epilogue
    pub fn dump_epilogue(&self, out: &mut dyn Write) -> AnalyzerResult<()> {
        let epilogue = self.image.epilogue();
        let base = self
            .image
            .section(names::EPILOGUE)
            .map(|s| s.start())
            .unwrap_or(self.image.len());
        writeln!(out, "Epilogue: {} bytes", epilogue.len())?;
        for (row, chunk) in epilogue.chunks(16).enumerate() {
            let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
            writeln!(out, "  {:08x}  {}", base + row * 16, hex.join(" "))?;
        }
        Ok(())
    }

    /// Print one string table entry
    pub fn dump_string(&self, id: u32, out: &mut dyn Write) -> AnalyzerResult<()> {
        let text = self
            .image
            .string(id)
            .ok_or(AnalyzerError::InvalidStringId(id))?;
        writeln!(out, "String {}: {:?}", id, text)?;
        Ok(())
    }

    /// Print one filename table entry
    pub fn dump_file_name(&self, id: u32, out: &mut dyn Write) -> AnalyzerResult<()> {
        let name = self
            .image
            .filename(id)
            .ok_or(AnalyzerError::InvalidFilenameId(id))?;
        writeln!(out, "Filename {}: {}", id, name)?;
        Ok(())
    }

    fn offset_record(&self, id: u32) -> AnalyzerResult<Value> {
        let header = self
            .image
            .function(id)
            .ok_or(AnalyzerError::InvalidFunctionId(id))?;
        Ok(json!({
            "function_id": id,
            "name": self.image.function_name(id),
            "virtual_offset": header.offset,
            "size": header.size,
            "source": self.source(id),
        }))
    }

    /// Emit the offset record of every function as one array
    pub fn dump_all_function_offsets(
        &self,
        printer: &mut dyn StructuredPrinter,
    ) -> AnalyzerResult<()> {
        let records = (0..self.image.function_count())
            .map(|id| self.offset_record(id))
            .collect::<AnalyzerResult<Vec<Value>>>()?;
        printer.emit(&Value::Array(records))?;
        Ok(())
    }

    /// Emit the offset record of one function
    pub fn dump_function_offsets(
        &self,
        id: u32,
        printer: &mut dyn StructuredPrinter,
    ) -> AnalyzerResult<()> {
        let record = self.offset_record(id)?;
        printer.emit(&record)?;
        Ok(())
    }
}

fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}
