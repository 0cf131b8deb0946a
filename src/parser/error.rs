use crate::lexer::{Span, TokenKind};
use compact_str::CompactString;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("expected next token to be {expected}, got {actual} instead")]
    UnexpectedToken {
        expected: TokenKind,
        actual: TokenKind,
    },
    #[error("no prefix parse function for {0}")]
    NoPrefixRule(TokenKind),
    #[error("cannot parse \"{0}\" as integer value")]
    InvalidInteger(CompactString),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    /// Span of the token the parser choked on.
    pub span: Span,
}

impl ParserError {
    pub fn code(&self) -> &'static str {
        match self.kind {
            ParserErrorKind::UnexpectedToken { .. } => "PE001",
            ParserErrorKind::NoPrefixRule(_) => "PE002",
            ParserErrorKind::InvalidInteger(_) => "PE003",
        }
    }
}
