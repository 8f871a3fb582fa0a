//! Contains the recursive-descent `Validator`.
//!
//! The validator consumes tokens front to back with one token of lookahead
//! and checks that they spell exactly one JSON value. Each nested object or
//! array is one level of recursion, so the call stack is the pushdown
//! automaton's stack; `max_depth` bounds it.

use crate::error::{ErrorKind, Expected, ParseError};
use crate::options::DEFAULT_MAX_DEPTH;
use crate::source::Position;
use crate::token::{Token, TokenKind};
use std::fmt;
use std::iter::Peekable;
use tracing::debug;

/// The kind of JSON value the validator accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `{ ... }`
    Object,
    /// `[ ... ]`
    Array,
    /// `"..."`
    String,
    /// `-1.5e3` and friends.
    Number,
    /// `true` or `false`.
    Boolean,
    /// `null`
    Null,
}

impl ValueKind {
    fn from_leaf(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::String => Some(ValueKind::String),
            TokenKind::Number => Some(ValueKind::Number),
            TokenKind::True | TokenKind::False => Some(ValueKind::Boolean),
            TokenKind::Null => Some(ValueKind::Null),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Object => "object",
            ValueKind::Array => "array",
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::Boolean => "boolean",
            ValueKind::Null => "null",
        })
    }
}

/// The JSON syntax validator.
///
/// Works over any iterator of lexer results: a `Lexer` directly (nothing is
/// buffered) or a batch `TokenStream`. Whitespace tokens are skipped at
/// every decision point. The first failure is remembered, and every later
/// call returns it again without touching the tokens.
pub struct Validator<I: Iterator<Item = Result<Token, ParseError>>> {
    /// The token source, with one token of lookahead.
    tokens: Peekable<I>,
    /// The maximum allowed nesting depth.
    max_depth: usize,
    /// The *current* nesting depth.
    depth: usize,
    /// The first error raised, replayed on later calls.
    failure: Option<ParseError>,
    /// Start of the most recent token seen, used to place end-of-input errors.
    last_position: Position,
}

impl<I: Iterator<Item = Result<Token, ParseError>>> Validator<I> {
    /// Creates a validator with the default depth limit.
    pub fn new(tokens: I) -> Self {
        Validator::with_max_depth(tokens, DEFAULT_MAX_DEPTH)
    }

    /// Creates a validator allowing at most `max_depth` open containers.
    pub fn with_max_depth(tokens: I, max_depth: usize) -> Self {
        Validator {
            tokens: tokens.peekable(),
            max_depth,
            depth: 0,
            failure: None,
            last_position: Position::start(),
        }
    }

    /// Validates one complete document: a single value followed by nothing
    /// but whitespace.
    pub fn validate_document(&mut self) -> Result<ValueKind, ParseError> {
        let kind = self.parse_value()?;
        self.finish()?;
        Ok(kind)
    }

    /// Consumes exactly one JSON value.
    pub fn parse_value(&mut self) -> Result<ValueKind, ParseError> {
        self.check_failed()?;
        let token = self.peek()?;
        match token.kind {
            TokenKind::LeftBrace => self.parse_object(),
            TokenKind::LeftBracket => self.parse_array(),
            kind => match ValueKind::from_leaf(kind) {
                Some(value) => {
                    self.advance();
                    Ok(value)
                }
                None => Err(self.unexpected(token, Expected::Value)),
            },
        }
    }

    /// Consumes `{`, its members, and `}`.
    pub fn parse_object(&mut self) -> Result<ValueKind, ParseError> {
        self.check_failed()?;
        let open = self.expect(TokenKind::LeftBrace, Expected::Kind(TokenKind::LeftBrace))?;
        self.enter(open, "object")?;

        if self.peek()?.kind == TokenKind::RightBrace {
            self.advance();
            self.depth -= 1;
            return Ok(ValueKind::Object);
        }

        let mut key_expected = Expected::KeyOrRightBrace;
        loop {
            self.expect(TokenKind::String, key_expected)?;
            self.expect(TokenKind::Colon, Expected::Kind(TokenKind::Colon))?;
            self.parse_value()?;

            if self.peek()?.kind != TokenKind::Comma {
                break;
            }
            self.advance();
            key_expected = Expected::Kind(TokenKind::String);
        }

        self.expect(TokenKind::RightBrace, Expected::CommaOr(TokenKind::RightBrace))?;
        self.depth -= 1;
        Ok(ValueKind::Object)
    }

    /// Consumes `[`, its elements, and `]`.
    pub fn parse_array(&mut self) -> Result<ValueKind, ParseError> {
        self.check_failed()?;
        let open = self.expect(
            TokenKind::LeftBracket,
            Expected::Kind(TokenKind::LeftBracket),
        )?;
        self.enter(open, "array")?;

        if self.peek()?.kind == TokenKind::RightBracket {
            self.advance();
            self.depth -= 1;
            return Ok(ValueKind::Array);
        }

        loop {
            self.parse_value()?;

            if self.peek()?.kind != TokenKind::Comma {
                break;
            }
            self.advance();
        }

        self.expect(
            TokenKind::RightBracket,
            Expected::CommaOr(TokenKind::RightBracket),
        )?;
        self.depth -= 1;
        Ok(ValueKind::Array)
    }

    /// Requires that only whitespace and end of input remain.
    pub fn finish(&mut self) -> Result<(), ParseError> {
        self.check_failed()?;
        let token = self.peek()?;
        if token.kind == TokenKind::Eof {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(token, Expected::EndOfInput))
        }
    }

    /// The error that stopped validation, if any.
    pub fn failure(&self) -> Option<&ParseError> {
        self.failure.as_ref()
    }

    /// The current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn check_failed(&self) -> Result<(), ParseError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    /// Remembers `error` as the terminal failure and hands it back.
    fn record(&mut self, error: ParseError) -> ParseError {
        self.failure = Some(error.clone());
        error
    }

    /// Skips whitespace and returns the lookahead token without consuming
    /// it. An exhausted source reads as an `Eof` token.
    fn peek(&mut self) -> Result<Token, ParseError> {
        loop {
            match self.tokens.peek() {
                Some(Ok(token)) if token.kind == TokenKind::Whitespace => {
                    self.last_position = token.position;
                    self.tokens.next();
                }
                Some(Ok(token)) => return Ok(*token),
                Some(Err(error)) => {
                    let error = error.clone();
                    self.tokens.next();
                    return Err(self.record(error));
                }
                None => return Ok(Token::new(TokenKind::Eof, self.last_position)),
            }
        }
    }

    /// Consumes the token last returned by `peek`.
    fn advance(&mut self) {
        if let Some(Ok(token)) = self.tokens.next() {
            self.last_position = token.position;
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: Expected) -> Result<Token, ParseError> {
        let token = self.peek()?;
        if token.kind == kind {
            self.advance();
            Ok(token)
        } else {
            Err(self.unexpected(token, expected))
        }
    }

    fn enter(&mut self, open: Token, container: &'static str) -> Result<(), ParseError> {
        if self.depth >= self.max_depth {
            let error = ParseError::new(
                ErrorKind::DepthLimitExceeded {
                    limit: self.max_depth,
                },
                open.position,
            );
            debug!(%error, "nesting limit hit");
            return Err(self.record(error));
        }
        self.depth += 1;
        debug!(
            container,
            depth = self.depth,
            line = open.position.line,
            column = open.position.column,
            "entering container"
        );
        Ok(())
    }

    fn unexpected(&mut self, token: Token, expected: Expected) -> ParseError {
        let kind = match token.kind {
            TokenKind::Eof => ErrorKind::UnexpectedEndOfInput { expected },
            found => ErrorKind::UnexpectedToken { expected, found },
        };
        debug!(
            %expected,
            found = token.kind.name(),
            line = token.position.line,
            column = token.position.column,
            "expectation violated"
        );
        self.record(ParseError::new(kind, token.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use TokenKind::*;

    /// Builds a token sequence from kinds, one column per token.
    fn tokens(kinds: &[TokenKind]) -> Vec<Result<Token, ParseError>> {
        kinds
            .iter()
            .enumerate()
            .map(|(i, &kind)| {
                Ok(Token::new(
                    kind,
                    Position {
                        offset: i,
                        line: 1,
                        column: i + 1,
                    },
                ))
            })
            .collect()
    }

    fn validate(kinds: &[TokenKind]) -> Result<ValueKind, ParseError> {
        Validator::new(tokens(kinds).into_iter()).validate_document()
    }

    fn error_kind(kinds: &[TokenKind]) -> ErrorKind {
        validate(kinds).unwrap_err().kind
    }

    #[test]
    fn test_leaf_values() {
        assert_eq!(validate(&[String, Eof]).unwrap(), ValueKind::String);
        assert_eq!(validate(&[Number]).unwrap(), ValueKind::Number);
        assert_eq!(validate(&[True, Eof]).unwrap(), ValueKind::Boolean);
        assert_eq!(validate(&[False, Eof]).unwrap(), ValueKind::Boolean);
        assert_eq!(validate(&[Whitespace, Null, Whitespace, Eof]).unwrap(), ValueKind::Null);
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(validate(&[LeftBrace, RightBrace, Eof]).unwrap(), ValueKind::Object);
        assert_eq!(
            validate(&[LeftBracket, Whitespace, RightBracket, Eof]).unwrap(),
            ValueKind::Array
        );
    }

    #[test]
    fn test_nested() {
        // {"a":[1,2,{"b":true}]}
        let doc = [
            LeftBrace, String, Colon, LeftBracket, Number, Comma, Number, Comma, LeftBrace,
            String, Colon, True, RightBrace, RightBracket, RightBrace, Eof,
        ];
        assert_eq!(validate(&doc).unwrap(), ValueKind::Object);
    }

    #[test]
    fn test_consecutive_whitespace_tokens_are_skipped() {
        let doc = [
            Whitespace, Whitespace, LeftBracket, Whitespace, Whitespace, Number, RightBracket,
        ];
        assert_eq!(validate(&doc).unwrap(), ValueKind::Array);
    }

    #[test]
    fn test_unexpected_tokens() {
        // {"a":[1,2,}
        let err = validate(&[
            LeftBrace, String, Colon, LeftBracket, Number, Comma, Number, Comma, RightBrace, Eof,
        ])
        .unwrap_err();
        assert_eq!(
            err.kind,
            ErrorKind::UnexpectedToken {
                expected: Expected::Value,
                found: RightBrace
            }
        );
        assert_eq!(err.position.column, 9);

        // [1 2]
        assert_eq!(
            error_kind(&[LeftBracket, Number, Whitespace, Number, RightBracket]),
            ErrorKind::UnexpectedToken {
                expected: Expected::CommaOr(RightBracket),
                found: Number
            }
        );

        // {1:2}
        assert_eq!(
            error_kind(&[LeftBrace, Number, Colon, Number, RightBrace]),
            ErrorKind::UnexpectedToken {
                expected: Expected::KeyOrRightBrace,
                found: Number
            }
        );

        // {"a" 1}
        assert_eq!(
            error_kind(&[LeftBrace, String, Whitespace, Number, RightBrace]),
            ErrorKind::UnexpectedToken {
                expected: Expected::Kind(Colon),
                found: Number
            }
        );
    }

    #[test]
    fn test_trailing_commas() {
        assert_eq!(
            error_kind(&[LeftBracket, Number, Comma, Number, Comma, RightBracket]),
            ErrorKind::UnexpectedToken {
                expected: Expected::Value,
                found: RightBracket
            }
        );
        assert_eq!(
            error_kind(&[LeftBrace, String, Colon, Number, Comma, RightBrace]),
            ErrorKind::UnexpectedToken {
                expected: Expected::Kind(String),
                found: RightBrace
            }
        );
    }

    #[test]
    fn test_end_of_input() {
        assert_eq!(
            error_kind(&[]),
            ErrorKind::UnexpectedEndOfInput {
                expected: Expected::Value
            }
        );
        assert_eq!(
            error_kind(&[Whitespace, Eof]),
            ErrorKind::UnexpectedEndOfInput {
                expected: Expected::Value
            }
        );
        assert_eq!(
            error_kind(&[LeftBracket, Number]),
            ErrorKind::UnexpectedEndOfInput {
                expected: Expected::CommaOr(RightBracket)
            }
        );
        assert_eq!(
            error_kind(&[LeftBrace, String, Colon, Eof]),
            ErrorKind::UnexpectedEndOfInput {
                expected: Expected::Value
            }
        );
    }

    #[test]
    fn test_trailing_tokens() {
        assert_eq!(
            error_kind(&[LeftBracket, RightBracket, Whitespace, LeftBracket, RightBracket]),
            ErrorKind::UnexpectedToken {
                expected: Expected::EndOfInput,
                found: LeftBracket
            }
        );
    }

    #[test]
    fn test_parse_value_leaves_trailing_tokens() {
        let mut validator = Validator::new(tokens(&[Number, Comma, Number, Eof]).into_iter());
        assert_eq!(validator.parse_value().unwrap(), ValueKind::Number);
        assert!(validator.finish().is_err());
    }

    #[test]
    fn test_lexer_errors_pass_through() {
        let lex_error = ParseError::new(ErrorKind::UnterminatedString, Position::start());
        let mut sequence = tokens(&[LeftBracket]);
        sequence.push(Err(lex_error.clone()));

        let mut validator = Validator::new(sequence.into_iter());
        assert_eq!(validator.parse_value().unwrap_err(), lex_error);
        assert_eq!(validator.failure(), Some(&lex_error));
    }

    #[test]
    fn test_failure_is_sticky() {
        let mut validator =
            Validator::new(tokens(&[LeftBracket, Comma, Number, RightBracket, Eof]).into_iter());
        let first = validator.parse_value().unwrap_err();
        assert_eq!(validator.parse_value().unwrap_err(), first);
        assert_eq!(validator.parse_array().unwrap_err(), first);
        assert_eq!(validator.finish().unwrap_err(), first);
    }

    #[test]
    fn test_exhausted_cursor_does_not_succeed_again() {
        let mut validator = Validator::new(tokens(&[Number, Eof]).into_iter());
        assert!(validator.validate_document().is_ok());
        assert_eq!(
            validator.parse_value().unwrap_err().kind,
            ErrorKind::UnexpectedEndOfInput {
                expected: Expected::Value
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut doc = vec![LeftBracket; 3];
        doc.extend([RightBracket; 3]);

        let ok = Validator::with_max_depth(tokens(&doc).into_iter(), 3).validate_document();
        assert_eq!(ok.unwrap(), ValueKind::Array);

        let err = Validator::with_max_depth(tokens(&doc).into_iter(), 2)
            .validate_document()
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DepthLimitExceeded { limit: 2 });
        assert_eq!(err.position.column, 3);
    }

    #[test]
    fn test_depth_returns_to_zero() {
        let mut validator = Validator::new(
            tokens(&[LeftBrace, String, Colon, LeftBracket, RightBracket, RightBrace]).into_iter(),
        );
        validator.validate_document().unwrap();
        assert_eq!(validator.depth(), 0);
    }

    #[test]
    fn test_explicit_container_entry_points() {
        let mut validator = Validator::new(tokens(&[Number]).into_iter());
        assert_eq!(
            validator.parse_object().unwrap_err().kind,
            ErrorKind::UnexpectedToken {
                expected: Expected::Kind(LeftBrace),
                found: Number
            }
        );

        let mut validator = Validator::new(tokens(&[LeftBracket, RightBracket]).into_iter());
        assert_eq!(validator.parse_array().unwrap(), ValueKind::Array);
    }
}
