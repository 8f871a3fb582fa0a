//! # jsonscan
//!
//! `jsonscan` is a byte-level JSON lexer and recursive-descent syntax
//! validator. It answers one question, "is this a well-formed JSON
//! document?", and it never builds the values it reads.
//!
//! ## Key Features
//!
//! * **100% Safe Rust:** Contains no `unsafe` code.
//! * **Pull-based input:** The lexer reads from any `ByteSource` with one
//!   byte of push-back. Slices and `std::io::Read` types work out of the box.
//! * **Streaming or batch:** Feed the `Lexer` straight into the `Validator`
//!   with no intermediate allocation, or materialize a `TokenStream` first.
//! * **Structured errors:** Every failure is a `ParseError` with a kind and a
//!   line/column. The library never prints.
//! * **Two dialects:** `Strict` follows RFC 8259 number and string rules,
//!   including UTF-8 in strings; `Legacy` accepts the permissive number
//!   extent, raw control bytes and arbitrary bytes inside strings.
//!
//! ## Quick Start
//!
//! ```
//! use jsonscan::{validate, ErrorKind, ValueKind};
//!
//! assert_eq!(validate(r#"{"a": [1, 2, {"b": true}]}"#).unwrap(), ValueKind::Object);
//!
//! let err = validate("[1, 2,]").unwrap_err();
//! assert!(matches!(err.kind, ErrorKind::UnexpectedToken { .. }));
//! assert_eq!(err.position.column, 7);
//! ```
//!
//! ## Looking at the tokens
//!
//! ```
//! use jsonscan::{tokenize, TokenKind};
//!
//! let stream = tokenize("true, null");
//! let kinds: Vec<_> = stream.kinds().collect();
//! assert_eq!(
//!     kinds,
//!     [TokenKind::True, TokenKind::Comma, TokenKind::Whitespace, TokenKind::Null, TokenKind::Eof]
//! );
//! ```

/// Contains the `ParseError` type and its `ErrorKind` taxonomy.
pub mod error;
/// Contains the lexing and validation `Options`.
pub mod options;
/// Contains the recursive-descent `Validator`.
pub mod parser;
/// Contains the `ByteSource` trait and its slice and reader implementations.
pub mod source;
/// Contains `TokenKind`, `Token` and `TokenStream`.
pub mod token;
/// Contains the `Lexer`.
pub mod tokenizer;

pub use error::{ErrorKind, Expected, ParseError};
pub use options::{Dialect, Options, DEFAULT_MAX_DEPTH, DEFAULT_MAX_INPUT_SIZE};
pub use parser::{Validator, ValueKind};
pub use source::{ByteSource, Position, ReaderSource, SliceSource};
pub use token::{Token, TokenKind, TokenStream};
pub use tokenizer::Lexer;

use std::io::Read;

/// Tokenizes `input` completely with the default `Options`.
///
/// The returned stream ends with an `Eof` token, or with an `Error` token
/// if lexing failed (the failure is available from `TokenStream::error`).
pub fn tokenize(input: impl AsRef<[u8]>) -> TokenStream {
    tokenize_with(SliceSource::new(input.as_ref()), &Options::default())
}

/// Tokenizes everything `source` produces.
pub fn tokenize_with<S: ByteSource>(source: S, options: &Options) -> TokenStream {
    let mut lexer = Lexer::with_options(source, options.clone());
    let mut tokens = Vec::new();
    loop {
        match lexer.scan_next() {
            Ok(token) => {
                tokens.push(token);
                if token.kind == TokenKind::Eof {
                    return TokenStream::new(tokens, None);
                }
            }
            Err(error) => {
                tokens.push(Token::new(TokenKind::Error, error.position));
                return TokenStream::new(tokens, Some(error));
            }
        }
    }
}

/// Validates `input` as one JSON document with the default `Options`.
///
/// # Errors
/// Returns the first lexical or grammatical `ParseError` encountered.
///
/// # Examples
/// ```
/// use jsonscan::{validate, ErrorKind};
///
/// assert!(validate("[]").is_ok());
/// assert_eq!(validate(r#""abc"#).unwrap_err().kind, ErrorKind::UnterminatedString);
/// ```
pub fn validate(input: impl AsRef<[u8]>) -> Result<ValueKind, ParseError> {
    validate_with(SliceSource::new(input.as_ref()), &Options::default())
}

/// Validates the document `source` produces.
///
/// The lexer feeds the validator directly; no token sequence is built.
pub fn validate_with<S: ByteSource>(source: S, options: &Options) -> Result<ValueKind, ParseError> {
    let lexer = Lexer::with_options(source, options.clone());
    Validator::with_max_depth(lexer, options.max_depth).validate_document()
}

/// Validates a document read from `reader`.
pub fn validate_reader<R: Read>(reader: R, options: &Options) -> Result<ValueKind, ParseError> {
    validate_with(ReaderSource::new(reader), options)
}

/// Validates an already materialized token sequence.
pub fn validate_stream(stream: &TokenStream, options: &Options) -> Result<ValueKind, ParseError> {
    Validator::with_max_depth(stream.iter(), options.max_depth).validate_document()
}
