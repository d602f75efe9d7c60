use std::rc::Rc;

use thiserror::Error;

use crate::ast::Literal;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    // Literals
    Number,
    String,
    Boolean,
    Ident,

    // Operators
    Assign,
    Plus,
    Minus,
    Asterisk,
    Slash,

    Equal,
    NotEqual,

    GreaterThan,
    GreaterEqual,
    LessThan,
    LessEqual,

    Comma,
    SemiColon,
    Dot,
    LParen,
    RParen,
    LBrace,
    RBrace,

    // Keywords
    Function,
    Return,
    If,
    Else,
    While,
    For,

    Eof,
}

impl TokenKind {
    pub fn describe(&self) -> &'static str {
        use TokenKind::*;
        match self {
            Number => "number",
            String => "string",
            Boolean => "boolean",
            Ident => "identifier",
            Assign => "'='",
            Plus => "'+'",
            Minus => "'-'",
            Asterisk => "'*'",
            Slash => "'/'",
            Equal => "'=='",
            NotEqual => "'!='",
            GreaterThan => "'>'",
            GreaterEqual => "'>='",
            LessThan => "'<'",
            LessEqual => "'<='",
            Comma => "','",
            SemiColon => "';'",
            Dot => "'.'",
            LParen => "'('",
            RParen => "')'",
            LBrace => "'{'",
            RBrace => "'}'",
            Function => "'function'",
            Return => "'return'",
            If => "'if'",
            Else => "'else'",
            While => "'while'",
            For => "'for'",
            Eof => "end of input",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// A lexeme together with its kind and, for literals, the value it denotes.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: Rc<str>,
    pub literal: Option<Literal>,
    pub start: usize,
    pub end: usize,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "'{}' at byte {}", self.lexeme, self.start),
        }
    }
}

/// Problems found while scanning. None of them stop the scan: the offending
/// lexeme is dropped and tokenizing resumes after it.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum LexError {
    #[error("unterminated string starting at byte {start}")]
    UnterminatedString { start: usize },
    #[error("unexpected character '{character}' at byte {position}")]
    UnexpectedCharacter { character: char, position: usize },
    #[error("invalid number literal '{literal}' at byte {position}")]
    InvalidNumber { literal: Rc<str>, position: usize },
}

fn keywords(ident: &str) -> Option<TokenKind> {
    match ident {
        "function" => Some(TokenKind::Function),
        "return" => Some(TokenKind::Return),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "while" => Some(TokenKind::While),
        "for" => Some(TokenKind::For),
        _ => None,
    }
}

#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
    diagnostics: Vec<LexError>,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self {
            input,
            iter,
            diagnostics: Vec::new(),
            finished: false,
        }
    }

    /// Scans the remaining input. The returned sequence always ends with a
    /// single [`TokenKind::Eof`] token.
    pub fn scan_tokens(&mut self) -> Vec<Token> {
        self.by_ref().collect()
    }

    /// Lexical errors reported so far.
    pub fn diagnostics(&self) -> &[LexError] {
        &self.diagnostics
    }

    fn is_letter(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn report(&mut self, error: LexError) {
        tracing::warn!(%error, "skipping lexeme");
        self.diagnostics.push(error);
    }

    fn token(&mut self, kind: TokenKind, start: usize, literal: Option<Literal>) -> Token {
        let end = self.next_idx();
        Token {
            kind,
            lexeme: self.input[start..end].into(),
            literal,
            start,
            end,
        }
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self
            .iter
            .next_if(|(_, ch)| Self::is_letter(*ch) || ch.is_ascii_digit())
            .is_some()
        {}

        let input = self.input;
        let ident = &input[start..self.next_idx()];
        match ident {
            "true" => self.token(TokenKind::Boolean, start, Some(Literal::Bool(true))),
            "false" => self.token(TokenKind::Boolean, start, Some(Literal::Bool(false))),
            _ => {
                let kind = keywords(ident).unwrap_or(TokenKind::Ident);
                self.token(kind, start, None)
            }
        }
    }

    fn read_number(&mut self, start: usize) -> Option<Token> {
        while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}

        // A '.' only belongs to the number when a digit follows it.
        let rest = self.input[self.next_idx()..].as_bytes();
        let has_fraction = rest.first() == Some(&b'.') && rest.get(1).is_some_and(u8::is_ascii_digit);
        if has_fraction {
            self.iter.next();
            while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}
        }

        let input = self.input;
        let text = &input[start..self.next_idx()];
        let literal = if has_fraction {
            text.parse().ok().map(Literal::Double)
        } else {
            text.parse().ok().map(Literal::Int)
        };

        match literal {
            Some(literal) => Some(self.token(TokenKind::Number, start, Some(literal))),
            None => {
                let literal = text.into();
                self.report(LexError::InvalidNumber {
                    literal,
                    position: start,
                });
                None
            }
        }
    }

    fn read_string(&mut self, start: usize) -> Option<Token> {
        loop {
            match self.iter.next() {
                Some((end, '\'')) => {
                    let contents = Literal::String(self.input[start + 1..end].into());
                    return Some(self.token(TokenKind::String, start, Some(contents)));
                }
                None => {
                    self.report(LexError::UnterminatedString { start });
                    return None;
                }
                _ => {}
            }
        }
    }

    fn skip_comment(&mut self) {
        while self.iter.next_if(|(_, ch)| *ch != '\n').is_some() {}
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }

    fn scan_token(&mut self, idx: usize, ch: char) -> Option<Token> {
        let kind = match ch {
            '=' => {
                if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                    TokenKind::Equal
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                    TokenKind::NotEqual
                } else {
                    self.report(LexError::UnexpectedCharacter {
                        character: ch,
                        position: idx,
                    });
                    return None;
                }
            }
            '<' => {
                if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                    TokenKind::LessEqual
                } else {
                    TokenKind::LessThan
                }
            }
            '>' => {
                if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::GreaterThan
                }
            }
            '/' => {
                if self.iter.next_if(|(_, ch)| *ch == '/').is_some() {
                    self.skip_comment();
                    return None;
                }
                TokenKind::Slash
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            ',' => TokenKind::Comma,
            ';' => TokenKind::SemiColon,
            '.' => TokenKind::Dot,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '\'' => return self.read_string(idx),
            c if Tokenizer::is_letter(c) => return Some(self.read_identifier(idx)),
            c if c.is_ascii_digit() => return self.read_number(idx),
            _ => {
                self.report(LexError::UnexpectedCharacter {
                    character: ch,
                    position: idx,
                });
                return None;
            }
        };
        Some(self.token(kind, idx, None))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        loop {
            while self.iter.next_if(|(_, ch)| ch.is_whitespace()).is_some() {}

            let Some((idx, ch)) = self.iter.next() else {
                self.finished = true;
                let end = self.input.len();
                return Some(self.token(TokenKind::Eof, end, None));
            };

            if let Some(token) = self.scan_token(idx, ch) {
                return Some(token);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input).map(|token| token.kind).collect()
    }

    #[test]
    fn test_single_characters() {
        let input = "=+(){},;.";
        let output = Tokenizer::new(input).scan_tokens();

        assert_eq!(
            output[0],
            Token {
                kind: TokenKind::Assign,
                lexeme: "=".into(),
                literal: None,
                start: 0,
                end: 1
            }
        );
        assert_eq!(
            output.iter().map(|token| token.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Assign,
                TokenKind::Plus,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Comma,
                TokenKind::SemiColon,
                TokenKind::Dot,
                TokenKind::Eof,
            ]
        );
        assert_eq!(output.last().map(|token| token.start), Some(input.len()));
    }

    #[test]
    fn test_function_declaration() {
        let input = "function add(x, y) {
    return x + y;
    }
    result = add(five, ten)
    ";
        let expected_output = vec![
            (TokenKind::Function, "function"),
            (TokenKind::Ident, "add"),
            (TokenKind::LParen, "("),
            (TokenKind::Ident, "x"),
            (TokenKind::Comma, ","),
            (TokenKind::Ident, "y"),
            (TokenKind::RParen, ")"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Return, "return"),
            (TokenKind::Ident, "x"),
            (TokenKind::Plus, "+"),
            (TokenKind::Ident, "y"),
            (TokenKind::SemiColon, ";"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Ident, "result"),
            (TokenKind::Assign, "="),
            (TokenKind::Ident, "add"),
            (TokenKind::LParen, "("),
            (TokenKind::Ident, "five"),
            (TokenKind::Comma, ","),
            (TokenKind::Ident, "ten"),
            (TokenKind::RParen, ")"),
            (TokenKind::Eof, ""),
        ];

        let output = Tokenizer::new(input).collect::<Vec<_>>();
        assert_eq!(
            output
                .iter()
                .map(|token| (token.kind, token.lexeme.as_ref()))
                .collect::<Vec<_>>(),
            expected_output
        )
    }

    #[test]
    fn test_two_character_operators() {
        assert_eq!(
            kinds("== != <= >= < > ="),
            vec![
                TokenKind::Equal,
                TokenKind::NotEqual,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::LessThan,
                TokenKind::GreaterThan,
                TokenKind::Assign,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("=>"),
            vec![TokenKind::Assign, TokenKind::GreaterThan, TokenKind::Eof]
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("if else while for return function functions _for"),
            vec![
                TokenKind::If,
                TokenKind::Else,
                TokenKind::While,
                TokenKind::For,
                TokenKind::Return,
                TokenKind::Function,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_literals() {
        let output = Tokenizer::new("42 3.5 'hi there' true false 7.").scan_tokens();
        let literals = output
            .iter()
            .map(|token| (token.kind, token.literal.clone()))
            .collect::<Vec<_>>();

        assert_eq!(
            literals,
            vec![
                (TokenKind::Number, Some(Literal::Int(42))),
                (TokenKind::Number, Some(Literal::Double(3.5))),
                (TokenKind::String, Some(Literal::String("hi there".into()))),
                (TokenKind::Boolean, Some(Literal::Bool(true))),
                (TokenKind::Boolean, Some(Literal::Bool(false))),
                (TokenKind::Number, Some(Literal::Int(7))),
                (TokenKind::Dot, None),
                (TokenKind::Eof, None),
            ]
        );
    }

    #[test]
    fn test_strings_are_verbatim() {
        let output = Tokenizer::new(r"'a\nb // not a comment'").scan_tokens();
        assert_eq!(
            output[0].literal,
            Some(Literal::String(r"a\nb // not a comment".into()))
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("a // comment ( ) {\nb // trailing"),
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::Eof]
        );
        assert_eq!(
            kinds("a / b"),
            vec![
                TokenKind::Ident,
                TokenKind::Slash,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_unexpected_characters_are_skipped() {
        let mut tokenizer = Tokenizer::new("a ! b # c");
        let output = tokenizer.scan_tokens();

        assert_eq!(
            output.iter().map(|token| token.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
        assert_eq!(
            tokenizer.diagnostics(),
            &[
                LexError::UnexpectedCharacter {
                    character: '!',
                    position: 2
                },
                LexError::UnexpectedCharacter {
                    character: '#',
                    position: 6
                },
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let mut tokenizer = Tokenizer::new("x = 'never closed");
        let output = tokenizer.scan_tokens();

        assert_eq!(
            output.iter().map(|token| token.kind).collect::<Vec<_>>(),
            vec![TokenKind::Ident, TokenKind::Assign, TokenKind::Eof]
        );
        assert_eq!(
            tokenizer.diagnostics(),
            &[LexError::UnterminatedString { start: 4 }]
        );
    }

    #[test]
    fn test_integer_overflow_is_reported() {
        let mut tokenizer = Tokenizer::new("99999999999999999999 + 1");
        let output = tokenizer.scan_tokens();

        assert_eq!(
            output.iter().map(|token| token.kind).collect::<Vec<_>>(),
            vec![TokenKind::Plus, TokenKind::Number, TokenKind::Eof]
        );
        assert!(matches!(
            tokenizer.diagnostics(),
            [LexError::InvalidNumber { position: 0, .. }]
        ));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("   \n\t "), vec![TokenKind::Eof]);
    }
}
