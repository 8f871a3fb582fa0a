//! Configuration shared by the lexer and the validator.

/// The default maximum nesting depth (e.g., `[[[]]]`) to prevent stack overflows.
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// The default maximum input size (10MB).
pub const DEFAULT_MAX_INPUT_SIZE: u64 = 10 * 1024 * 1024;

/// How strictly lexemes are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// RFC 8259: numbers must follow the JSON number grammar and strings
    /// must be UTF-8 with no raw control characters.
    #[default]
    Strict,
    /// Any run of digits, `.`, `e`, `E`, `+` and `-` starting with a digit
    /// or `-` is a number, and raw control characters are allowed inside
    /// strings. String bytes are not checked for UTF-8.
    Legacy,
}

/// Limits and dialect for one lexing/validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Lexeme strictness.
    pub dialect: Dialect,
    /// How many containers may be open at once.
    pub max_depth: usize,
    /// How many bytes may be read before giving up.
    pub max_input_size: u64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            dialect: Dialect::Strict,
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
        }
    }
}

impl Options {
    /// The default options with the `Legacy` dialect.
    pub fn legacy() -> Self {
        Options {
            dialect: Dialect::Legacy,
            ..Options::default()
        }
    }

    /// Sets the dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Sets the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the maximum input size in bytes.
    pub fn with_max_input_size(mut self, max_input_size: u64) -> Self {
        self.max_input_size = max_input_size;
        self
    }
}
