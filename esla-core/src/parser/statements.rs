use std::rc::Rc;

use crate::ast::{Block, Expression, FunctionDecl, Statement};
use crate::lexer::TokenKind;
use crate::parser::error::Expected;
use crate::parser::expressions::{parse_expression, parse_sequence, Precedence};
use crate::parser::{ParseError, Parser};

pub fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    let statement = match parser.peek_kind() {
        TokenKind::Function => Statement::FunctionDecl(parse_function_declaration(parser)?),
        TokenKind::Return => Statement::Return(parse_return_statement(parser)?),
        TokenKind::LBrace => Statement::Block(parse_block_statement(parser)?),
        _ => Statement::Expression(parse_expression_statement(parser)?),
    };

    parser.next_if_kind(TokenKind::SemiColon);
    Ok(statement)
}

fn parse_function_declaration(parser: &mut Parser) -> Result<FunctionDecl, ParseError> {
    parser.expect_token(TokenKind::Function)?;
    let name = parser.parse_ident(Expected::FunctionName)?;

    parser.expect_token(TokenKind::LParen)?;
    let parameters = parse_sequence(
        parser,
        |parser| parser.parse_ident(Expected::ParameterName),
        ParseError::TooManyParameters,
    )?;

    let body = Rc::new(parse_block_statement(parser)?);

    Ok(FunctionDecl {
        name,
        parameters,
        body,
    })
}

fn parse_return_statement(parser: &mut Parser) -> Result<Option<Expression>, ParseError> {
    parser.expect_token(TokenKind::Return)?;

    match parser.peek_kind() {
        TokenKind::SemiColon | TokenKind::RBrace | TokenKind::Eof => Ok(None),
        _ => Ok(Some(parse_expression(parser, Precedence::Lowest)?)),
    }
}

fn parse_block_statement(parser: &mut Parser) -> Result<Block, ParseError> {
    parser.expect_token(TokenKind::LBrace)?;

    let mut statements = Vec::new();
    while !matches!(parser.peek_kind(), TokenKind::RBrace | TokenKind::Eof) {
        statements.push(parse_statement(parser)?);
    }
    parser.expect_token(TokenKind::RBrace)?;

    Ok(Block { statements })
}

fn parse_expression_statement(parser: &mut Parser) -> Result<Expression, ParseError> {
    parse_expression(parser, Precedence::Lowest)
}
