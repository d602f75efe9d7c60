use super::error::{Expected, ParseError};
use super::MAX_ARITY;
use crate::ast::{BinaryOperator, Expression, Identifier};
use crate::lexer::{Token, TokenKind};
use crate::parser::Parser;

#[derive(PartialOrd, PartialEq, Debug)]
pub enum Precedence {
    Lowest = 0,
    Assign,
    Sum,
    Product,
    Call,
}

pub fn precedence_of(token: &TokenKind) -> Precedence {
    match token {
        TokenKind::Assign => Precedence::Assign,
        TokenKind::Plus => Precedence::Sum,
        TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk => Precedence::Product,
        TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::Dot => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

pub fn parse_expression(
    parser: &mut Parser,
    precedence: Precedence,
) -> Result<Expression, ParseError> {
    let token = parser.next_token();
    let mut left_expression = prefix_parsing(token, parser)?;

    loop {
        let next_precedence = precedence_of(&parser.peek_kind());
        if precedence >= next_precedence {
            break;
        }

        let next_token = parser.next_token();
        let Some(infix_parse_function) = infix_parsing_function(next_token.kind) else {
            break;
        };
        left_expression = infix_parse_function(left_expression, parser)?;
    }

    Ok(left_expression)
}

fn parse_grouped_expression(parser: &mut Parser) -> Result<Expression, ParseError> {
    let expression = parse_expression(parser, Precedence::Lowest)?;
    parser.expect_token(TokenKind::RParen)?;

    Ok(expression)
}

/// Comma separated elements up to and including the closing `)`.
pub(crate) fn parse_sequence<T>(
    parser: &mut Parser,
    parse_element: impl Fn(&mut Parser) -> Result<T, ParseError>,
    too_many: ParseError,
) -> Result<Vec<T>, ParseError> {
    let mut elements = Vec::new();
    if parser.next_if_kind(TokenKind::RParen) {
        return Ok(elements);
    }

    loop {
        if elements.len() >= MAX_ARITY {
            return Err(too_many);
        }
        elements.push(parse_element(parser)?);

        let next = parser.next_token();
        match next.kind {
            TokenKind::Comma => continue,
            TokenKind::RParen => return Ok(elements),
            _ => return Err(ParseError::unexpected_token(TokenKind::RParen, next)),
        }
    }
}

pub fn prefix_parsing(token: Token, parser: &mut Parser) -> Result<Expression, ParseError> {
    match token.kind {
        TokenKind::Number | TokenKind::String | TokenKind::Boolean => match token.literal {
            Some(literal) => Ok(Expression::Literal(literal)),
            None => Err(ParseError::ExpectedExpression(token)),
        },
        TokenKind::Ident => Ok(Expression::Variable(Identifier { name: token.lexeme })),
        TokenKind::LParen => parse_grouped_expression(parser),
        TokenKind::Eof => Err(ParseError::PrematureEndOfInput {
            expected: Expected::Expression,
        }),
        _ => Err(ParseError::ExpectedExpression(token)),
    }
}

type InfixFunction = Box<dyn FnOnce(Expression, &mut Parser) -> Result<Expression, ParseError>>;

fn binary_operation(token: TokenKind, operator: BinaryOperator) -> InfixFunction {
    Box::new(
        move |left: Expression, parser: &mut Parser| -> Result<Expression, ParseError> {
            let new_precedence = precedence_of(&token);

            Ok(Expression::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(parse_expression(parser, new_precedence)?),
            })
        },
    )
}

fn parse_assignment(left: Expression, parser: &mut Parser) -> Result<Expression, ParseError> {
    // Parsing the right side at the lowest precedence makes `=` right-associative.
    let value = Box::new(parse_expression(parser, Precedence::Lowest)?);

    match left {
        Expression::Variable(name) => Ok(Expression::Assign { name, value }),
        Expression::Get { object, property } => Ok(Expression::Set {
            object,
            property,
            value,
        }),
        _ => Err(ParseError::InvalidAssignmentTarget),
    }
}

fn parse_call_expression(left: Expression, parser: &mut Parser) -> Result<Expression, ParseError> {
    let arguments = parse_sequence(
        parser,
        |parser| parse_expression(parser, Precedence::Lowest),
        ParseError::TooManyArguments,
    )?;

    Ok(Expression::Call {
        callee: Box::new(left),
        arguments,
    })
}

fn parse_get_expression(left: Expression, parser: &mut Parser) -> Result<Expression, ParseError> {
    let property = parser.parse_ident(Expected::PropertyName)?;

    Ok(Expression::Get {
        object: Box::new(left),
        property,
    })
}

pub fn infix_parsing_function(token: TokenKind) -> Option<InfixFunction> {
    match token {
        TokenKind::Plus => Some(binary_operation(TokenKind::Plus, BinaryOperator::Add)),
        TokenKind::Minus => Some(binary_operation(TokenKind::Minus, BinaryOperator::Subtract)),
        TokenKind::Asterisk => Some(binary_operation(
            TokenKind::Asterisk,
            BinaryOperator::Multiply,
        )),
        TokenKind::Slash => Some(binary_operation(TokenKind::Slash, BinaryOperator::Divide)),
        TokenKind::Assign => Some(Box::new(parse_assignment)),
        TokenKind::LParen => Some(Box::new(parse_call_expression)),
        TokenKind::Dot => Some(Box::new(parse_get_expression)),
        _ => None,
    }
}
