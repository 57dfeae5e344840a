//! Scoped disassembler option overrides

use std::ops::{Deref, DerefMut};

use disassembler::{Disassembler, RenderOptions};

/// Adds render options for the lifetime of the guard
///
/// The options in effect when the scope was opened are restored when it
/// is dropped, whichever way the enclosing code exits.
pub struct OptionScope<'a> {
    disassembler: &'a mut Disassembler,
    saved: RenderOptions,
}

impl<'a> OptionScope<'a> {
    /// Open a scope that ors `addition` into the current options
    pub fn new(disassembler: &'a mut Disassembler, addition: RenderOptions) -> Self {
        let saved = disassembler.options();
        disassembler.set_options(saved | addition);
        Self {
            disassembler,
            saved,
        }
    }

    /// Run `f` with `addition` in effect
    pub fn run<R>(
        disassembler: &mut Disassembler,
        addition: RenderOptions,
        f: impl FnOnce(&mut Disassembler) -> R,
    ) -> R {
        let mut scope = OptionScope::new(disassembler, addition);
        f(&mut scope)
    }
}

impl Deref for OptionScope<'_> {
    type Target = Disassembler;

    fn deref(&self) -> &Disassembler {
        self.disassembler
    }
}

impl DerefMut for OptionScope<'_> {
    fn deref_mut(&mut self) -> &mut Disassembler {
        self.disassembler
    }
}

impl Drop for OptionScope<'_> {
    fn drop(&mut self) {
        self.disassembler.set_options(self.saved);
    }
}
