//! Rendering options

bitflags::bitflags! {
    /// What the disassembler includes in its output.
    ///
    /// Options combine with bitwise-or; the empty set renders bare
    /// instructions only.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderOptions: u8 {
        /// Source location line under each function banner.
        const INCLUDE_SOURCE = 1 << 0;
        /// Function id after the function name in banners.
        const INCLUDE_FUNCTION_IDS = 1 << 1;
        /// Aligned columns, jump labels and resolved string/function operands.
        const PRETTY = 1 << 2;
        /// Absolute file offset before every instruction.
        const INCLUDE_VIRTUAL_OFFSETS = 1 << 3;
    }
}

impl RenderOptions {
    /// No options set
    pub const NONE: Self = Self::empty();

    /// Session baseline: source and function ids, plus pretty printing if requested
    pub fn baseline(pretty: bool) -> Self {
        let options = Self::INCLUDE_SOURCE | Self::INCLUDE_FUNCTION_IDS;
        if pretty {
            options | Self::PRETTY
        } else {
            options
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::NONE
    }
}
