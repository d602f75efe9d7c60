pub mod error;
pub mod expressions;
pub mod statements;

use crate::ast::{Identifier, Program, Statement};
use crate::lexer::{Token, TokenKind, Tokenizer};
pub use error::{Expected, ParseError};
use statements::parse_statement;

/// Upper bound on the parameters of a declaration and the arguments of a call.
pub const MAX_ARITY: usize = 255;

pub struct Parser {
    pub iter: std::iter::Peekable<std::vec::IntoIter<Token>>,
    end: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens.last().map(|token| token.end).unwrap_or(0);
        let iter = tokens.into_iter().peekable();
        Self { iter, end }
    }

    /// Tokenizes `source` and parses the result. Lexical errors are reported
    /// by the tokenizer and do not reach the parser.
    pub fn from_source(source: &str) -> Self {
        Self::new(Tokenizer::new(source).scan_tokens())
    }

    /// Next token, or an end-of-input token once the stream is exhausted.
    pub(crate) fn next_token(&mut self) -> Token {
        self.iter.next().unwrap_or_else(|| Token {
            kind: TokenKind::Eof,
            lexeme: "".into(),
            literal: None,
            start: self.end,
            end: self.end,
        })
    }

    pub(crate) fn peek_kind(&mut self) -> TokenKind {
        self.iter
            .peek()
            .map(|token| token.kind)
            .unwrap_or(TokenKind::Eof)
    }

    pub(crate) fn next_if_kind(&mut self, kind: TokenKind) -> bool {
        self.iter.next_if(|token| token.kind == kind).is_some()
    }

    pub(crate) fn parse_ident(&mut self, expected: Expected) -> Result<Identifier, ParseError> {
        let token = self.next_token();
        match token.kind {
            TokenKind::Ident => Ok(Identifier { name: token.lexeme }),
            _ => Err(ParseError::unexpected_other(expected, token)),
        }
    }

    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<Token, ParseError> {
        let token = self.next_token();
        if token.kind == token_kind {
            Ok(token)
        } else {
            Err(ParseError::unexpected_token(token_kind, token))
        }
    }

    pub fn is_at_end(&mut self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    /// Parses the next statement.
    pub fn parse(&mut self) -> Result<Statement, ParseError> {
        parse_statement(self)
    }

    /// Parses one statement and requires it to be followed by end of input.
    pub fn parse_single(&mut self) -> Result<Statement, ParseError> {
        let statement = parse_statement(self)?;
        if self.is_at_end() {
            Ok(statement)
        } else {
            Err(ParseError::TrailingInput(self.next_token()))
        }
    }

    /// Parses every statement up to end of input. The first error discards
    /// the whole program.
    pub fn parse_all(&mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            statements.push(parse_statement(self)?);
        }

        tracing::trace!(statements = statements.len(), "parsed program");
        Ok(Program { statements })
    }
}
