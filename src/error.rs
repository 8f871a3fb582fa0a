//! Contains the primary `ParseError` type for the library.
//!
//! Every failure, whether it comes from the tokenizer or the validator, is
//! terminal for the document being checked. Errors are returned to the
//! caller as values; nothing in the library prints them.
use crate::source::Position;
use crate::token::TokenKind;
use std::fmt;
use thiserror::Error;

/// What the validator was looking for when it hit an unexpected token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// The start of any JSON value.
    Value,
    /// One specific token kind.
    Kind(TokenKind),
    /// A `,` continuing a list, or the token closing it.
    CommaOr(TokenKind),
    /// An object key, or `}` closing an empty object.
    KeyOrRightBrace,
    /// Nothing more: the document should be over.
    EndOfInput,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Value => f.write_str("a value"),
            Expected::Kind(kind) => write!(f, "{}", kind.describe()),
            Expected::CommaOr(close) => write!(f, "',' or {}", close.describe()),
            Expected::KeyOrRightBrace => f.write_str("a string key or '}'"),
            Expected::EndOfInput => f.write_str("end of input"),
        }
    }
}

/// The specific category of a `ParseError`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// End of input was reached inside a string literal.
    #[error("Unterminated string")]
    UnterminatedString,

    /// A backslash followed by an unknown byte, or `\u` without 4 hex digits.
    #[error("Invalid escape sequence {}", describe_byte(.found))]
    InvalidEscape {
        /// The offending byte, or `None` if input ended.
        found: Option<u8>,
    },

    /// A `t`, `f` or `n` that does not continue into `true`, `false` or `null`.
    #[error("Expected '{expected}', found {}", describe_byte(.found))]
    InvalidLiteral {
        /// The literal being matched.
        expected: &'static str,
        /// The mismatched byte, or `None` if input ended.
        found: Option<u8>,
    },

    /// A byte that cannot start any token.
    #[error("Unexpected character {} near {snippet:?}", describe_char(.byte))]
    UnrecognizedByte {
        /// The offending byte.
        byte: u8,
        /// Up to ten bytes that followed it, for context.
        snippet: String,
    },

    /// A number lexeme that violates the strict number grammar.
    #[error("Invalid number: {reason}")]
    InvalidNumber {
        /// Which rule was broken.
        reason: &'static str,
    },

    /// A raw control byte inside a string (strict dialect only).
    #[error("Unescaped control character 0x{byte:02x} in string")]
    ControlCharacter {
        /// The control byte.
        byte: u8,
    },

    /// A byte sequence inside a string that is not UTF-8 (strict dialect only).
    #[error("Invalid UTF-8 in string, found {}", describe_byte(.found))]
    InvalidUtf8 {
        /// The offending byte, or `None` if input ended mid-sequence.
        found: Option<u8>,
    },

    /// The validator found a token not valid at this grammar position.
    #[error("Unexpected {}, expected {expected}", .found.describe())]
    UnexpectedToken {
        /// What the grammar allowed here.
        expected: Expected,
        /// What was actually there.
        found: TokenKind,
    },

    /// The validator needed a token but the input was exhausted.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput {
        /// What the grammar allowed here.
        expected: Expected,
    },

    /// Containers nested deeper than the configured limit.
    #[error("Maximum nesting depth of {limit} exceeded")]
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// The input is larger than the configured limit.
    #[error("Input exceeds maximum size limit of {limit} bytes")]
    InputTooLarge {
        /// The configured limit.
        limit: u64,
    },

    /// The underlying reader failed.
    #[error("Read failed: {0}")]
    Io(String),
}

/// The primary error type for all lexing and validation operations.
///
/// This struct pairs an `ErrorKind` with the position (byte offset, line,
/// column) where the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error: {kind} at line {}, column {}.", .position.line, .position.column)]
pub struct ParseError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Where it went wrong.
    pub position: Position,
}

impl ParseError {
    pub(crate) fn new(kind: ErrorKind, position: Position) -> Self {
        ParseError { kind, position }
    }

    /// Returns `true` if the error was raised while tokenizing rather than
    /// while checking the token sequence against the grammar.
    pub fn is_lexical(&self) -> bool {
        !matches!(
            self.kind,
            ErrorKind::UnexpectedToken { .. }
                | ErrorKind::UnexpectedEndOfInput { .. }
                | ErrorKind::DepthLimitExceeded { .. }
        )
    }
}

fn describe_byte(byte: &Option<u8>) -> String {
    match byte {
        Some(b) => describe_char(b),
        None => "end of input".to_string(),
    }
}

fn describe_char(byte: &u8) -> String {
    if byte.is_ascii_graphic() || *byte == b' ' {
        format!("'{}'", *byte as char)
    } else {
        format!("byte 0x{byte:02x}")
    }
}
