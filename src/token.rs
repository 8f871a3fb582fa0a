//! Defines `TokenKind`, `Token` and the batch `TokenStream`.
//!
//! These are the shared vocabulary between the `Lexer` and the `Validator`.
//! Tokens carry their kind and where they start, nothing else: the lexeme
//! itself is discarded as soon as it has been checked.

use crate::error::ParseError;
use crate::source::Position;
use std::fmt;

/// The kind of a `Token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of input.
    Eof,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// A maximal run of spaces, tabs, newlines and carriage returns.
    Whitespace,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// A string literal, e.g. `"hello"`.
    String,
    /// A number literal, e.g. `-12.5e3`.
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
    /// Lexing failed; terminates a `TokenStream`.
    Error,
}

impl TokenKind {
    /// All kinds, in declaration order.
    pub const ALL: [TokenKind; 14] = [
        TokenKind::Eof,
        TokenKind::LeftBrace,
        TokenKind::RightBrace,
        TokenKind::LeftBracket,
        TokenKind::RightBracket,
        TokenKind::Whitespace,
        TokenKind::Comma,
        TokenKind::Colon,
        TokenKind::String,
        TokenKind::Number,
        TokenKind::True,
        TokenKind::False,
        TokenKind::Null,
        TokenKind::Error,
    ];

    /// The stable diagnostic name, e.g. `TOKEN_LEFT_BRACE`.
    pub const fn name(self) -> &'static str {
        match self {
            TokenKind::Eof => "TOKEN_EOF",
            TokenKind::LeftBrace => "TOKEN_LEFT_BRACE",
            TokenKind::RightBrace => "TOKEN_RIGHT_BRACE",
            TokenKind::LeftBracket => "TOKEN_LEFT_BRACKET",
            TokenKind::RightBracket => "TOKEN_RIGHT_BRACKET",
            TokenKind::Whitespace => "TOKEN_WHITESPACE",
            TokenKind::Comma => "TOKEN_COMMA",
            TokenKind::Colon => "TOKEN_COLON",
            TokenKind::String => "TOKEN_STRING",
            TokenKind::Number => "TOKEN_NUMBER",
            TokenKind::True => "TOKEN_TRUE",
            TokenKind::False => "TOKEN_FALSE",
            TokenKind::Null => "TOKEN_NULL",
            TokenKind::Error => "TOKEN_ERROR",
        }
    }

    /// A short human description used in error messages.
    pub const fn describe(self) -> &'static str {
        match self {
            TokenKind::Eof => "end of input",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::String => "a string",
            TokenKind::Number => "a number",
            TokenKind::True => "'true'",
            TokenKind::False => "'false'",
            TokenKind::Null => "'null'",
            TokenKind::Error => "an invalid token",
        }
    }

    /// Whether a token of this kind is a complete value on its own.
    pub const fn is_leaf_value(self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::Number
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
        )
    }

    /// Whether this kind ends token production.
    pub const fn is_terminal(self) -> bool {
        matches!(self, TokenKind::Eof | TokenKind::Error)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single token produced by the `Lexer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// The type of the token.
    pub kind: TokenKind,
    /// Where the token's first byte sits in the input.
    pub position: Position,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, position: Position) -> Self {
        Token { kind, position }
    }
}

/// A fully materialized token sequence.
///
/// The last token is always either `Eof` or `Error`. When it is `Error` the
/// lexer's failure is kept alongside, and iterating the stream yields it in
/// place of the error token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
    error: Option<ParseError>,
}

impl TokenStream {
    pub(crate) fn new(tokens: Vec<Token>, error: Option<ParseError>) -> Self {
        debug_assert!(tokens.last().is_some_and(|t| t.kind.is_terminal()));
        TokenStream { tokens, error }
    }

    /// The tokens, including the terminating `Eof` or `Error`.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The lexer failure, if tokenizing did not reach end of input.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// The token kinds in order.
    pub fn kinds(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.tokens.iter().map(|t| t.kind)
    }

    /// Number of tokens, including the terminator.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always `false`: a stream holds at least its terminator.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterates the tokens as the `Validator` consumes them.
    pub fn iter(&self) -> TokenStreamIter<'_> {
        TokenStreamIter {
            tokens: self.tokens.iter(),
            error: self.error.as_ref(),
        }
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = Result<Token, ParseError>;
    type IntoIter = TokenStreamIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a `TokenStream`, turning the `Error` token back into the
/// lexer's `ParseError`.
#[derive(Debug, Clone)]
pub struct TokenStreamIter<'a> {
    tokens: std::slice::Iter<'a, Token>,
    error: Option<&'a ParseError>,
}

impl Iterator for TokenStreamIter<'_> {
    type Item = Result<Token, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = *self.tokens.next()?;
        match (token.kind, self.error) {
            (TokenKind::Error, Some(error)) => Some(Err(error.clone())),
            _ => Some(Ok(token)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_names_are_unique_and_prefixed() {
        let mut names: Vec<_> = TokenKind::ALL.iter().map(|k| k.name()).collect();
        assert!(names.iter().all(|n| n.starts_with("TOKEN_")));
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TokenKind::ALL.len());
        assert_eq!(TokenKind::LeftBracket.to_string(), "TOKEN_LEFT_BRACKET");
    }

    #[test]
    fn test_leaf_values() {
        let leaves: Vec<_> = TokenKind::ALL
            .into_iter()
            .filter(|k| k.is_leaf_value())
            .collect();
        assert_eq!(
            leaves,
            vec![
                TokenKind::String,
                TokenKind::Number,
                TokenKind::True,
                TokenKind::False,
                TokenKind::Null
            ]
        );
    }

    #[test]
    fn test_stream_iter_surfaces_error() {
        let at = Position::start();
        let error = ParseError::new(ErrorKind::UnterminatedString, at);
        let stream = TokenStream::new(
            vec![
                Token::new(TokenKind::LeftBracket, at),
                Token::new(TokenKind::Error, at),
            ],
            Some(error.clone()),
        );
        let items: Vec<_> = stream.iter().collect();
        assert_eq!(items[0], Ok(Token::new(TokenKind::LeftBracket, at)));
        assert_eq!(items[1], Err(error));
        assert_eq!(items.len(), 2);
    }
}
