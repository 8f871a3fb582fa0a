//! The byte-based tokenizer (lexer).
//!
//! The `Lexer` pulls bytes from a `ByteSource` one at a time and classifies
//! each token by kind. It dispatches on a 256-entry lookup table, checks
//! every lexeme against the JSON rules for its kind, and then throws the
//! lexeme away. Only the kind and start position survive.

use crate::error::{ErrorKind, ParseError};
use crate::options::{Dialect, Options};
use crate::source::{ByteSource, Position};
use crate::token::{Token, TokenKind};
use tracing::{debug, trace};

// --- The Lookup Table (LUT) ---
// A 256-entry array classifying every byte by the token it can start.
pub(crate) const W: u8 = 1; // Whitespace
pub(crate) const S: u8 = 2; // Structural
pub(crate) const L: u8 = 3; // Literal
pub(crate) const D: u8 = 4; // Digit (and '-')
pub(crate) const Q: u8 = 5; // Quote

static BYTE_PROPERTIES: [u8; 256] = {
    let mut table = [0; 256];
    table[b' ' as usize] = W;
    table[b'\n' as usize] = W;
    table[b'\r' as usize] = W;
    table[b'\t' as usize] = W;

    table[b'{' as usize] = S;
    table[b'}' as usize] = S;
    table[b'[' as usize] = S;
    table[b']' as usize] = S;
    table[b':' as usize] = S;
    table[b',' as usize] = S;

    table[b't' as usize] = L;
    table[b'f' as usize] = L;
    table[b'n' as usize] = L;

    table[b'"' as usize] = Q;

    table[b'-' as usize] = D;
    let mut digit = b'0';
    while digit <= b'9' {
        table[digit as usize] = D;
        digit += 1;
    }

    // 0: All other bytes start no token.
    table
};

/// How many bytes after an unrecognized byte are captured for context.
const SNIPPET_LEN: usize = 10;

/// Bytes that may continue a number once it has started.
#[inline]
fn is_number_byte(byte: u8) -> bool {
    matches!(byte, b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-')
}

/// Where a strict number lexeme is in the RFC 8259 number grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    Minus,
    Zero,
    Integer,
    Dot,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentDigits,
    Invalid(&'static str),
}

impl NumberState {
    fn start(first: u8) -> Self {
        match first {
            b'-' => NumberState::Minus,
            b'0' => NumberState::Zero,
            _ => NumberState::Integer,
        }
    }

    fn step(self, byte: u8) -> Self {
        use NumberState::*;
        match (self, byte) {
            (Invalid(reason), _) => Invalid(reason),
            (Minus, b'0') => Zero,
            (Minus, b'1'..=b'9') => Integer,
            (Minus, _) => Invalid("expected a digit after '-'"),
            (Zero, b'0'..=b'9') => Invalid("leading zeros not allowed"),
            (Integer, b'0'..=b'9') => Integer,
            (Zero | Integer, b'.') => Dot,
            (Dot, b'0'..=b'9') | (Fraction, b'0'..=b'9') => Fraction,
            (Dot, _) => Invalid("expected a digit after the decimal point"),
            (Zero | Integer | Fraction, b'e' | b'E') => Exponent,
            (Fraction, b'.') => Invalid("multiple decimal points"),
            (Exponent, b'+' | b'-') => ExponentSign,
            (Exponent | ExponentSign | ExponentDigits, b'0'..=b'9') => ExponentDigits,
            (Exponent | ExponentSign, _) => Invalid("expected a digit in the exponent"),
            (ExponentDigits, _) => Invalid("malformed exponent"),
            (Zero | Integer | Fraction, _) => {
                Invalid("sign only allowed at the start or after an exponent")
            }
        }
    }

    fn finish(self) -> Result<(), &'static str> {
        match self {
            NumberState::Zero
            | NumberState::Integer
            | NumberState::Fraction
            | NumberState::ExponentDigits => Ok(()),
            NumberState::Minus => Err("expected a digit after '-'"),
            NumberState::Dot => Err("cannot end with a decimal point"),
            NumberState::Exponent | NumberState::ExponentSign => {
                Err("expected a digit in the exponent")
            }
            NumberState::Invalid(reason) => Err(reason),
        }
    }
}

/// The JSON lexer.
///
/// Call `scan_next` until it returns an `Eof` token or an error. Once
/// either has been produced the lexer is finished and every further call
/// returns that same terminal result.
pub struct Lexer<B> {
    source: B,
    options: Options,
    terminal: Option<Result<Token, ParseError>>,
}

impl<B: ByteSource> Lexer<B> {
    /// Creates a lexer with the default `Options`.
    pub fn new(source: B) -> Self {
        Lexer::with_options(source, Options::default())
    }

    /// Creates a lexer with explicit `Options`.
    pub fn with_options(source: B, options: Options) -> Self {
        Lexer {
            source,
            options,
            terminal: None,
        }
    }

    /// Whether an `Eof` token or an error has been produced.
    pub fn is_finished(&self) -> bool {
        self.terminal.is_some()
    }

    /// Gives back the underlying source.
    pub fn into_source(self) -> B {
        self.source
    }

    /// Produces the next token.
    pub fn scan_next(&mut self) -> Result<Token, ParseError> {
        if let Some(terminal) = &self.terminal {
            return terminal.clone();
        }

        let start = self.source.position();
        let result = self.scan_token(start).map(|kind| Token::new(kind, start));
        match &result {
            Ok(token) => {
                trace!(
                    token = token.kind.name(),
                    line = start.line,
                    column = start.column,
                    "token produced"
                );
                if token.kind == TokenKind::Eof {
                    self.terminal = Some(result.clone());
                }
            }
            Err(error) => {
                debug!(%error, "lexing stopped");
                self.terminal = Some(result.clone());
            }
        }
        result
    }

    fn error(&self, kind: ErrorKind, position: Position) -> ParseError {
        ParseError::new(kind, position)
    }

    /// Reads one byte, enforcing the input size limit.
    fn read(&mut self) -> Result<Option<u8>, ParseError> {
        let position = self.source.position();
        let byte = self
            .source
            .next_byte()
            .map_err(|e| self.error(ErrorKind::Io(e.to_string()), position))?;
        if byte.is_some() && position.offset as u64 >= self.options.max_input_size {
            return Err(self.error(
                ErrorKind::InputTooLarge {
                    limit: self.options.max_input_size,
                },
                position,
            ));
        }
        Ok(byte)
    }

    fn scan_token(&mut self, start: Position) -> Result<TokenKind, ParseError> {
        let Some(byte) = self.read()? else {
            return Ok(TokenKind::Eof);
        };

        match BYTE_PROPERTIES[byte as usize] {
            S => Ok(match byte {
                b'{' => TokenKind::LeftBrace,
                b'}' => TokenKind::RightBrace,
                b'[' => TokenKind::LeftBracket,
                b']' => TokenKind::RightBracket,
                b':' => TokenKind::Colon,
                _ => TokenKind::Comma,
            }),
            W => self.lex_whitespace(),
            L => match byte {
                b't' => self.lex_literal(b"rue", "true", TokenKind::True),
                b'f' => self.lex_literal(b"alse", "false", TokenKind::False),
                _ => self.lex_literal(b"ull", "null", TokenKind::Null),
            },
            D => self.lex_number(byte, start),
            Q => self.lex_string(start),
            _ => Err(self.unrecognized(byte, start)),
        }
    }

    /// Coalesces a whitespace run into one token.
    fn lex_whitespace(&mut self) -> Result<TokenKind, ParseError> {
        while let Some(byte) = self.read()? {
            if BYTE_PROPERTIES[byte as usize] != W {
                self.source.push_back(byte);
                break;
            }
        }
        Ok(TokenKind::Whitespace)
    }

    /// Matches the rest of `true`, `false` or `null` exactly.
    ///
    /// A mismatched byte is pushed back so the error points at it.
    fn lex_literal(
        &mut self,
        rest: &'static [u8],
        literal: &'static str,
        kind: TokenKind,
    ) -> Result<TokenKind, ParseError> {
        for &expected in rest {
            let at = self.source.position();
            match self.read()? {
                Some(byte) if byte == expected => {}
                found => {
                    if let Some(byte) = found {
                        self.source.push_back(byte);
                    }
                    return Err(self.error(
                        ErrorKind::InvalidLiteral {
                            expected: literal,
                            found,
                        },
                        at,
                    ));
                }
            }
        }
        Ok(kind)
    }

    /// Consumes the greedy number extent, then checks it in strict mode.
    fn lex_number(&mut self, first: u8, start: Position) -> Result<TokenKind, ParseError> {
        let strict = self.options.dialect == Dialect::Strict;
        let mut state = NumberState::start(first);

        while let Some(byte) = self.read()? {
            if !is_number_byte(byte) {
                self.source.push_back(byte);
                break;
            }
            if strict {
                state = state.step(byte);
            }
        }

        if strict {
            state
                .finish()
                .map_err(|reason| self.error(ErrorKind::InvalidNumber { reason }, start))?;
        }
        Ok(TokenKind::Number)
    }

    /// Scans to the closing quote, validating escapes along the way.
    fn lex_string(&mut self, start: Position) -> Result<TokenKind, ParseError> {
        let strict = self.options.dialect == Dialect::Strict;

        loop {
            // Hot path: let the source skip plain content in bulk, but never
            // past the size limit; `read` reports the overflow.
            let before = self.source.position();
            let budget = self
                .options
                .max_input_size
                .saturating_sub(before.offset as u64);
            self.source
                .skip_string_run(strict, usize::try_from(budget).unwrap_or(usize::MAX))
                .map_err(|e| self.error(ErrorKind::Io(e.to_string()), before))?;

            let at = self.source.position();
            match self.read()? {
                None => return Err(self.error(ErrorKind::UnterminatedString, start)),
                Some(b'"') => return Ok(TokenKind::String),
                Some(b'\\') => self.lex_escape()?,
                Some(byte) if strict && byte < 0x20 => {
                    return Err(self.error(ErrorKind::ControlCharacter { byte }, at));
                }
                Some(byte) if strict && !byte.is_ascii() => self.lex_utf8(byte, at)?,
                Some(_) => {}
            }
        }
    }

    /// Validates the escape sequence following a backslash.
    fn lex_escape(&mut self) -> Result<(), ParseError> {
        let at = self.source.position();
        match self.read()? {
            Some(b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't') => Ok(()),
            Some(b'u') => {
                for _ in 0..4 {
                    let at = self.source.position();
                    match self.read()? {
                        Some(byte) if byte.is_ascii_hexdigit() => {}
                        found => {
                            return Err(self.error(ErrorKind::InvalidEscape { found }, at));
                        }
                    }
                }
                Ok(())
            }
            found => Err(self.error(ErrorKind::InvalidEscape { found }, at)),
        }
    }

    /// Checks the continuation bytes of a multi-byte UTF-8 sequence.
    fn lex_utf8(&mut self, lead: u8, at: Position) -> Result<(), ParseError> {
        // Ranges for the second byte rule out overlong forms, surrogates and
        // code points above U+10FFFF.
        let (len, mut range) = match lead {
            0xC2..=0xDF => (1, 0x80..=0xBF),
            0xE0 => (2, 0xA0..=0xBF),
            0xE1..=0xEC | 0xEE..=0xEF => (2, 0x80..=0xBF),
            0xED => (2, 0x80..=0x9F),
            0xF0 => (3, 0x90..=0xBF),
            0xF1..=0xF3 => (3, 0x80..=0xBF),
            0xF4 => (3, 0x80..=0x8F),
            _ => return Err(self.error(ErrorKind::InvalidUtf8 { found: Some(lead) }, at)),
        };
        for _ in 0..len {
            let at = self.source.position();
            match self.read()? {
                Some(byte) if range.contains(&byte) => {}
                found => return Err(self.error(ErrorKind::InvalidUtf8 { found }, at)),
            }
            range = 0x80..=0xBF;
        }
        Ok(())
    }

    /// Builds the error for a byte that starts no token, capturing the
    /// bytes that follow it for context.
    fn unrecognized(&mut self, byte: u8, start: Position) -> ParseError {
        let mut snippet = Vec::with_capacity(SNIPPET_LEN);
        while snippet.len() < SNIPPET_LEN {
            match self.source.next_byte() {
                Ok(Some(b)) => snippet.push(b),
                _ => break,
            }
        }
        self.error(
            ErrorKind::UnrecognizedByte {
                byte,
                snippet: String::from_utf8_lossy(&snippet).into_owned(),
            },
            start,
        )
    }
}

/// Yields every token up to and including `Eof`, or up to the first error.
impl<B: ByteSource> Iterator for Lexer<B> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_finished() {
            return None;
        }
        Some(self.scan_next())
    }
}

impl<B: ByteSource> std::iter::FusedIterator for Lexer<B> {}
