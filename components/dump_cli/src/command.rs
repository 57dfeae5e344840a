//! Command line tokenization and verb lookup

/// Flag that adds virtual offsets to a disassembly
pub const OFFSETS_FLAG: &str = "-offsets";

/// Flag that selects JSON structured output
pub const JSON_FLAG: &str = "-json";

/// Interactive command verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Function frequency, or basic blocks of one function
    Function,
    /// Instruction frequency
    Instruction,
    /// Disassemble the image or one function
    Disassemble,
    /// Offsets of the function containing a virtual offset
    AtVirtual,
    /// Help listing or lookup
    Help,
    /// Epilogue dump
    Epilogue,
    /// Hot basic blocks
    Block,
    /// Summary figures
    Summary,
    /// Page working set
    Io,
    /// String table entry
    String,
    /// Filename table entry
    Filename,
    /// Function offsets
    Offsets,
    /// End the session
    Quit,
}

/// Canonical names and aliases
const VERBS: &[(&str, Verb)] = &[
    ("function", Verb::Function),
    ("fun", Verb::Function),
    ("instruction", Verb::Instruction),
    ("inst", Verb::Instruction),
    ("disassemble", Verb::Disassemble),
    ("dis", Verb::Disassemble),
    ("at-virtual", Verb::AtVirtual),
    ("at_virtual", Verb::AtVirtual),
    ("help", Verb::Help),
    ("h", Verb::Help),
    ("epilogue", Verb::Epilogue),
    ("epi", Verb::Epilogue),
    ("block", Verb::Block),
    ("summary", Verb::Summary),
    ("sum", Verb::Summary),
    ("io", Verb::Io),
    ("string", Verb::String),
    ("str", Verb::String),
    ("filename", Verb::Filename),
    ("offsets", Verb::Offsets),
    ("offset", Verb::Offsets),
    ("quit", Verb::Quit),
];

impl Verb {
    /// Resolve a canonical name or alias
    pub fn lookup(token: &str) -> Option<Verb> {
        VERBS
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, verb)| *verb)
    }

    /// Canonical name, used for help lookups
    pub fn name(self) -> &'static str {
        match self {
            Verb::Function => "function",
            Verb::Instruction => "instruction",
            Verb::Disassemble => "disassemble",
            Verb::AtVirtual => "at-virtual",
            Verb::Help => "help",
            Verb::Epilogue => "epilogue",
            Verb::Block => "block",
            Verb::Summary => "summary",
            Verb::Io => "io",
            Verb::String => "string",
            Verb::Filename => "filename",
            Verb::Offsets => "offsets",
            Verb::Quit => "quit",
        }
    }
}

/// A tokenized command with a recognized verb
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command<'a> {
    /// The resolved verb
    pub verb: Verb,
    /// Remaining tokens
    pub args: Vec<&'a str>,
}

impl<'a> Command<'a> {
    /// Remove the first occurrence of `flag` from the arguments
    ///
    /// Returns whether the flag was present.
    pub fn take_flag(&mut self, flag: &str) -> bool {
        match self.args.iter().position(|arg| *arg == flag) {
            Some(idx) => {
                self.args.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Number of positional arguments
    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// Result of parsing one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine<'a> {
    /// No tokens
    Empty,
    /// First token is not a known verb
    Unknown(&'a str),
    /// A recognized command
    Command(Command<'a>),
}

/// Split a line on whitespace and resolve its verb
pub fn parse(line: &str) -> ParsedLine<'_> {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return ParsedLine::Empty;
    };
    match Verb::lookup(first) {
        Some(verb) => ParsedLine::Command(Command {
            verb,
            args: tokens.collect(),
        }),
        None => ParsedLine::Unknown(first),
    }
}

/// Parse an unsigned integer, detecting the radix from its prefix
///
/// `0x` is hexadecimal, `0b` binary, `0o` or a bare leading `0` octal,
/// anything else decimal.
pub fn parse_integer(token: &str) -> Option<u32> {
    let lower = token.get(..2).map(str::to_ascii_lowercase);
    let (digits, radix) = match lower.as_deref() {
        Some("0x") => (&token[2..], 16),
        Some("0b") => (&token[2..], 2),
        Some("0o") => (&token[2..], 8),
        _ if token.len() > 1 && token.starts_with('0') => (&token[1..], 8),
        _ => (token, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}
