use thiserror::Error;

use crate::lexer::{Token, TokenKind};

#[derive(Debug, PartialEq, Clone, Error)]
pub enum ParseError {
    #[error("expected {expected}, reached end of input")]
    PrematureEndOfInput { expected: Expected },
    #[error("expected {expected}, got {got}")]
    UnexpectedToken { expected: Expected, got: Token },
    #[error("expected expression, got {0}")]
    ExpectedExpression(Token),
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("cannot have more than {} parameters", super::MAX_ARITY)]
    TooManyParameters,
    #[error("cannot have more than {} arguments", super::MAX_ARITY)]
    TooManyArguments,
    #[error("unexpected {0} after statement")]
    TrailingInput(Token),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Expected {
    Token(TokenKind),
    Identifier,
    Expression,
    FunctionName,
    ParameterName,
    PropertyName,
}

impl std::fmt::Display for Expected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{}", kind),
            Expected::Identifier => write!(f, "identifier"),
            Expected::Expression => write!(f, "expression"),
            Expected::FunctionName => write!(f, "function name"),
            Expected::ParameterName => write!(f, "parameter name"),
            Expected::PropertyName => write!(f, "property name after '.'"),
        }
    }
}

impl ParseError {
    pub fn unexpected_token(expected: TokenKind, got: Token) -> ParseError {
        ParseError::unexpected_other(Expected::Token(expected), got)
    }

    /// The end-of-input token turns into [`ParseError::PrematureEndOfInput`].
    pub fn unexpected_other(expected: Expected, got: Token) -> ParseError {
        match got.kind {
            TokenKind::Eof => ParseError::PrematureEndOfInput { expected },
            _ => ParseError::UnexpectedToken { expected, got },
        }
    }
}
