//! Lexer (tokenizer) for minic source code
//!
//! Converts raw source text into [`Token`]s one at a time. The parser only sees
//! the lexer through the [`TokenSource`] trait, so any producer of tokens (a
//! pre-built vector in tests, for example) can drive it.
//!
//! Lexical errors never abort scanning. A malformed lexeme comes back as a
//! token of kind [`TokenKind::Error`] carrying a [`LexErrorKind`], and the
//! parser reports it as a token it cannot match.

use super::ast::SourceLocation;
use crate::constants::MAX_LEXEME_LEN;
use log::trace;
use std::fmt;
use thiserror::Error;

/// Lexical error kinds carried by error tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("invalid character")]
    InvalidChar,
    #[error("invalid number format")]
    InvalidNumber,
    #[error("consecutive operators not allowed")]
    ConsecutiveOperators,
    #[error("lexeme longer than {} characters", MAX_LEXEME_LEN)]
    TooLong,
    #[error("unterminated block comment")]
    UnterminatedComment,
}

/// All token kinds produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals and names
    Number,
    Identifier,

    // Keywords
    Int,
    Float,
    Char,
    Print,
    If,
    While,
    Repeat,
    Until,
    Factorial,

    // Arithmetic
    Plus,  // +
    Minus, // -
    Star,  // *
    Slash, // /

    // Assignment and comparison
    Equals,     // =
    EqualEqual, // ==
    NotEqual,   // !=
    Less,       // <
    Greater,    // >

    // Punctuation
    Semicolon, // ;
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]

    Eof,
    Error(LexErrorKind),
}

impl TokenKind {
    /// `+ - * /`, the operators subject to the consecutive-operator rule
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash
        )
    }

    /// Tokens error recovery may stop at
    pub fn is_statement_boundary(self) -> bool {
        matches!(
            self,
            TokenKind::Semicolon
                | TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::Int
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Repeat
                | TokenKind::Print
                | TokenKind::Eof
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number => write!(f, "NUMBER"),
            TokenKind::Identifier => write!(f, "IDENTIFIER"),
            TokenKind::Int => write!(f, "INT"),
            TokenKind::Float => write!(f, "FLOAT"),
            TokenKind::Char => write!(f, "CHAR"),
            TokenKind::Print => write!(f, "PRINT"),
            TokenKind::If => write!(f, "IF"),
            TokenKind::While => write!(f, "WHILE"),
            TokenKind::Repeat => write!(f, "REPEAT"),
            TokenKind::Until => write!(f, "UNTIL"),
            TokenKind::Factorial => write!(f, "FACTORIAL"),
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash => write!(f, "OPERATOR"),
            TokenKind::Equals => write!(f, "EQUALS"),
            TokenKind::EqualEqual => write!(f, "EQUAL_EQUAL"),
            TokenKind::NotEqual => write!(f, "NOT_EQUAL"),
            TokenKind::Less => write!(f, "LESS"),
            TokenKind::Greater => write!(f, "GREATER"),
            TokenKind::Semicolon => write!(f, "SEMICOLON"),
            TokenKind::LParen => write!(f, "LPAREN"),
            TokenKind::RParen => write!(f, "RPAREN"),
            TokenKind::LBrace => write!(f, "LBRACE"),
            TokenKind::RBrace => write!(f, "RBRACE"),
            TokenKind::LBracket => write!(f, "LBRACKET"),
            TokenKind::RBracket => write!(f, "RBRACKET"),
            TokenKind::Eof => write!(f, "EOF"),
            TokenKind::Error(kind) => write!(f, "ERROR ({})", kind),
        }
    }
}

/// A lexical unit with its source text and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }

    pub fn eof(location: SourceLocation) -> Self {
        Token::new(TokenKind::Eof, "EOF", location)
    }

    /// The lexical error carried by this token, if any
    pub fn error(&self) -> Option<LexErrorKind> {
        match self.kind {
            TokenKind::Error(kind) => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} '{}' at {}",
            self.kind.to_string(),
            self.lexeme,
            self.location
        )
    }
}

/// The capability the parser consumes: a stateful, single-step token stream.
///
/// After the end of input, `next_token` keeps returning `Eof`.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;

    /// Rewind to the start of the input with fresh position counters
    fn reset(&mut self);
}

/// Lexer for minic source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    /// Whether the previous token was one of `+ - * /`
    last_was_operator: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            last_was_operator: false,
        }
    }

    /// Tokenize the entire input, ending with a single `Eof` token
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    fn scan_token(&mut self) -> Token {
        if let Some(comment_start) = self.skip_whitespace_and_comments() {
            return Token::new(
                TokenKind::Error(LexErrorKind::UnterminatedComment),
                "/*",
                comment_start,
            );
        }

        let loc = self.current_location();
        let Some(ch) = self.advance() else {
            return Token::eof(loc);
        };

        let token = match ch {
            '0'..='9' => self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(ch, loc),
            '+' => self.arithmetic(TokenKind::Plus, ch, loc),
            '-' => self.arithmetic(TokenKind::Minus, ch, loc),
            '*' => self.arithmetic(TokenKind::Star, ch, loc),
            '/' => self.arithmetic(TokenKind::Slash, ch, loc),
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::new(TokenKind::EqualEqual, "==", loc)
                } else {
                    Token::new(TokenKind::Equals, "=", loc)
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    Token::new(TokenKind::NotEqual, "!=", loc)
                } else {
                    Token::new(TokenKind::Error(LexErrorKind::InvalidChar), "!", loc)
                }
            }
            '<' => Token::new(TokenKind::Less, "<", loc),
            '>' => Token::new(TokenKind::Greater, ">", loc),
            ';' => Token::new(TokenKind::Semicolon, ";", loc),
            '(' => Token::new(TokenKind::LParen, "(", loc),
            ')' => Token::new(TokenKind::RParen, ")", loc),
            '{' => Token::new(TokenKind::LBrace, "{", loc),
            '}' => Token::new(TokenKind::RBrace, "}", loc),
            '[' => Token::new(TokenKind::LBracket, "[", loc),
            ']' => Token::new(TokenKind::RBracket, "]", loc),
            _ => Token::new(
                TokenKind::Error(LexErrorKind::InvalidChar),
                ch.to_string(),
                loc,
            ),
        };

        // A rejected operator keeps the flag set, so `+++` reports twice
        match token.kind {
            kind if kind.is_arithmetic() => self.last_was_operator = true,
            TokenKind::Error(LexErrorKind::ConsecutiveOperators) => {}
            _ => self.last_was_operator = false,
        }

        trace!("lexed {}", token);
        token
    }

    /// Arithmetic operator, rejected if it directly follows another one
    fn arithmetic(&mut self, kind: TokenKind, ch: char, loc: SourceLocation) -> Token {
        if self.last_was_operator {
            Token::new(
                TokenKind::Error(LexErrorKind::ConsecutiveOperators),
                ch.to_string(),
                loc,
            )
        } else {
            Token::new(kind, ch.to_string(), loc)
        }
    }

    /// Parse numeric literal (integers only)
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Token {
        let mut lexeme = String::new();
        lexeme.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                lexeme.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // `12ab` is one malformed lexeme, not a number followed by a name
        if matches!(self.peek(), Some(ch) if ch.is_ascii_alphabetic() || ch == '_') {
            while let Some(ch) = self.peek() {
                if ch.is_ascii_alphanumeric() || ch == '_' {
                    lexeme.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
            return Token::new(TokenKind::Error(LexErrorKind::InvalidNumber), lexeme, loc);
        }

        if lexeme.len() > MAX_LEXEME_LEN {
            return Token::new(TokenKind::Error(LexErrorKind::TooLong), lexeme, loc);
        }

        Token::new(TokenKind::Number, lexeme, loc)
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if ident.len() > MAX_LEXEME_LEN {
            return Token::new(TokenKind::Error(LexErrorKind::TooLong), ident, loc);
        }

        let kind = match ident.as_str() {
            "int" => TokenKind::Int,
            "float" => TokenKind::Float,
            "char" => TokenKind::Char,
            "print" => TokenKind::Print,
            "if" => TokenKind::If,
            "while" => TokenKind::While,
            "repeat" => TokenKind::Repeat,
            "until" => TokenKind::Until,
            "factorial" => TokenKind::Factorial,
            _ => TokenKind::Identifier,
        };

        Token::new(kind, ident, loc)
    }

    /// Skip whitespace and comments.
    ///
    /// Returns the start of an unterminated block comment, if one swallowed
    /// the rest of the input.
    fn skip_whitespace_and_comments(&mut self) -> Option<SourceLocation> {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        if let Err(start) = self.skip_block_comment() {
                            return Some(start);
                        }
                    } else {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), SourceLocation> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance(); // skip '*'
                self.advance(); // skip '/'
                return Ok(());
            }
            self.advance();
        }

        Err(start_loc)
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

impl TokenSource for Lexer {
    fn next_token(&mut self) -> Token {
        self.scan_token()
    }

    fn reset(&mut self) {
        self.position = 0;
        self.line = 1;
        self.column = 1;
        self.last_was_operator = false;
    }
}

/// A pre-lexed token sequence usable as a [`TokenSource`]
#[derive(Debug, Clone)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenBuffer {
    /// Wrap `tokens`, appending an `Eof` if the sequence lacks one
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let loc = tokens
                .last()
                .map(|t| {
                    SourceLocation::new(
                        t.location.line,
                        t.location.column + t.lexeme.chars().count(),
                    )
                })
                .unwrap_or_else(|| SourceLocation::new(1, 1));
            tokens.push(Token::eof(loc));
        }
        TokenBuffer {
            tokens,
            position: 0,
        }
    }
}

impl TokenSource for TokenBuffer {
    fn next_token(&mut self) -> Token {
        // `new` guarantees a trailing Eof, which is returned forever
        let last = self.tokens.len() - 1;
        let token = self.tokens[self.position.min(last)].clone();
        if self.position < last {
            self.position += 1;
        }
        token
    }

    fn reset(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("int x; x = 42;");
        let tokens = lexer.tokenize();

        assert_eq!(tokens[0].kind, TokenKind::Int);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].lexeme, "x");
        assert_eq!(tokens[2].kind, TokenKind::Semicolon);
        assert_eq!(tokens[3].kind, TokenKind::Identifier);
        assert_eq!(tokens[4].kind, TokenKind::Equals);
        assert_eq!(tokens[5].kind, TokenKind::Number);
        assert_eq!(tokens[5].lexeme, "42");
        assert_eq!(tokens[6].kind, TokenKind::Semicolon);
        assert_eq!(tokens[7].kind, TokenKind::Eof);
    }

    #[test]
    fn test_keywords_and_comparisons() {
        assert_eq!(
            kinds("repeat until factorial while if print float char == != < >"),
            vec![
                TokenKind::Repeat,
                TokenKind::Until,
                TokenKind::Factorial,
                TokenKind::While,
                TokenKind::If,
                TokenKind::Print,
                TokenKind::Float,
                TokenKind::Char,
                TokenKind::EqualEqual,
                TokenKind::NotEqual,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = Lexer::new("int x;\n  print x;").tokenize();

        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(1, 5));
        assert_eq!(tokens[3].location, SourceLocation::new(2, 3));
        assert_eq!(tokens[4].location, SourceLocation::new(2, 9));
    }

    #[test]
    fn test_consecutive_operators() {
        let tokens = Lexer::new("x = 3 + +2;").tokenize();

        assert_eq!(tokens[3].kind, TokenKind::Plus);
        assert_eq!(
            tokens[4].kind,
            TokenKind::Error(LexErrorKind::ConsecutiveOperators)
        );
        assert_eq!(tokens[5].kind, TokenKind::Number);
    }

    #[test]
    fn test_operator_flag_cleared_by_operand() {
        assert_eq!(
            kinds("1 - 2 - 3"),
            vec![
                TokenKind::Number,
                TokenKind::Minus,
                TokenKind::Number,
                TokenKind::Minus,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            kinds("int x; // comment\nint y; /* block\ncomment */ int z;"),
            vec![
                TokenKind::Int,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Int,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Int,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_comment() {
        assert_eq!(
            kinds("int x; /* never closed"),
            vec![
                TokenKind::Int,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Error(LexErrorKind::UnterminatedComment),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_invalid_lexemes() {
        let tokens = Lexer::new("12ab @ !").tokenize();

        assert_eq!(tokens[0].error(), Some(LexErrorKind::InvalidNumber));
        assert_eq!(tokens[0].lexeme, "12ab");
        assert_eq!(tokens[1].error(), Some(LexErrorKind::InvalidChar));
        assert_eq!(tokens[2].error(), Some(LexErrorKind::InvalidChar));
    }

    #[test]
    fn test_too_long_identifier() {
        let name = "a".repeat(MAX_LEXEME_LEN + 1);
        let tokens = Lexer::new(&name).tokenize();
        assert_eq!(tokens[0].error(), Some(LexErrorKind::TooLong));
    }

    #[test]
    fn test_reset_restarts_positions() {
        let mut lexer = Lexer::new("a\nb");
        lexer.next_token();
        let b = lexer.next_token();
        assert_eq!(b.location, SourceLocation::new(2, 1));

        lexer.reset();
        let a = lexer.next_token();
        assert_eq!(a.lexeme, "a");
        assert_eq!(a.location, SourceLocation::new(1, 1));
    }

    #[test]
    fn test_eof_repeats() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_token_buffer_appends_eof() {
        let mut buffer = TokenBuffer::new(vec![Token::new(
            TokenKind::Identifier,
            "abc",
            SourceLocation::new(1, 1),
        )]);

        assert_eq!(buffer.next_token().kind, TokenKind::Identifier);
        let eof = buffer.next_token();
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(eof.location, SourceLocation::new(1, 4));
        assert_eq!(buffer.next_token().kind, TokenKind::Eof);

        buffer.reset();
        assert_eq!(buffer.next_token().kind, TokenKind::Identifier);
    }
}
