//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, token helpers, error recovery, and the parse entry
//! points.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, synchronization, coordination
//! - `declarations`: `int` variable and array declarations
//! - `statements`: assignments, control flow, print, blocks
//! - `expressions`: expressions with precedence climbing
//!
//! # Error Recovery
//!
//! Parse functions return `Result` and use `?` to abandon a malformed construct.
//! The statement loops ([`Parser::parse_statement_list`]) are the recovery
//! points: they record the error, call [`Parser::synchronize`], and carry on
//! with the next statement. A missing `;` after an otherwise complete statement
//! is reported in place and the statement is kept.
//!
//! Every statement attempt consumes at least one token, so parsing always
//! terminates in a number of steps bounded by the input length.

use crate::constants::{MAX_ERRORS, MAX_NESTING_DEPTH};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::parser::ast::*;
use crate::parser::lexer::{Lexer, Token, TokenBuffer, TokenKind, TokenSource};
use log::{debug, trace};
use thiserror::Error;

/// Syntax error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    UnexpectedToken,
    MissingSemicolon,
    MissingIdentifier,
    MissingEquals,
    InvalidExpression,
    MissingParentheses,
    MissingCondition,
    MissingBlockBraces,
    InvalidOperator,
    InvalidArraySize,
    InvalidArrayIndex,
    NestingTooDeep,
}

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub kind: SyntaxErrorKind,
    pub message: String,
    pub location: SourceLocation,
}

impl ParseError {
    /// Build an error about `token`, worded the way each kind is reported
    pub fn new(kind: SyntaxErrorKind, token: &Token) -> Self {
        let lexeme = &token.lexeme;
        let mut message = match kind {
            SyntaxErrorKind::UnexpectedToken => format!("Unexpected '{}'", lexeme),
            SyntaxErrorKind::MissingSemicolon => format!("Missing semicolon after '{}'", lexeme),
            SyntaxErrorKind::MissingIdentifier => {
                format!("Missing identifier after '{}'", lexeme)
            }
            SyntaxErrorKind::MissingEquals => format!("Expected '=' after '{}'", lexeme),
            SyntaxErrorKind::InvalidExpression => {
                format!("Invalid expression starting with '{}'", lexeme)
            }
            SyntaxErrorKind::MissingParentheses => {
                format!("Missing parentheses near '{}'", lexeme)
            }
            SyntaxErrorKind::MissingCondition => format!("Expected condition after '{}'", lexeme),
            SyntaxErrorKind::MissingBlockBraces => {
                format!("Expected '{{}}' block near '{}'", lexeme)
            }
            SyntaxErrorKind::InvalidOperator => format!("Invalid operator '{}'", lexeme),
            SyntaxErrorKind::InvalidArraySize => format!("Invalid array size near '{}'", lexeme),
            SyntaxErrorKind::InvalidArrayIndex => {
                format!("Invalid array index near '{}'", lexeme)
            }
            SyntaxErrorKind::NestingTooDeep => format!(
                "Nesting deeper than {} levels at '{}'",
                MAX_NESTING_DEPTH, lexeme
            ),
        };
        if let Some(lex_error) = token.error() {
            message.push_str(&format!(" ({})", lex_error));
        }

        // A missing terminator belongs just past the token it should follow
        let location = if kind == SyntaxErrorKind::MissingSemicolon {
            SourceLocation::new(
                token.location.line,
                token.location.column + token.lexeme.chars().count(),
            )
        } else {
            token.location
        };

        ParseError {
            kind,
            message,
            location,
        }
    }

    /// Replace the generated message, keeping kind and position
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl Diagnostic for ParseError {
    fn location(&self) -> SourceLocation {
        self.location
    }
}

/// Limits applied while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Capacity of the syntax error list
    pub max_errors: usize,
    /// Maximum nesting of statements, blocks and parenthesised expressions
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_errors: MAX_ERRORS,
            max_depth: MAX_NESTING_DEPTH,
        }
    }
}

/// Recursive descent parser with one token of lookahead
pub struct Parser<S: TokenSource = Lexer> {
    pub(crate) tokens: S,
    pub(crate) current: Token,
    pub(crate) previous: Token,
    pub(crate) errors: Diagnostics<ParseError>,
    pub(crate) depth: usize,
    pub(crate) config: ParserConfig,
}

impl Parser<Lexer> {
    /// Create a parser over source text
    pub fn new(source: &str) -> Self {
        Parser::with_source(Lexer::new(source))
    }
}

impl Parser<TokenBuffer> {
    /// Create a parser over an already lexed token sequence
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Parser::with_source(TokenBuffer::new(tokens))
    }
}

impl<S: TokenSource> Parser<S> {
    /// Create a parser over any token source
    pub fn with_source(tokens: S) -> Self {
        Self::with_config(tokens, ParserConfig::default())
    }

    pub fn with_config(tokens: S, config: ParserConfig) -> Self {
        let start = Token::eof(SourceLocation::new(1, 1));
        Parser {
            tokens,
            current: start.clone(),
            previous: start,
            errors: Diagnostics::with_capacity(config.max_errors),
            depth: 0,
            config,
        }
    }

    /// Parse the whole input into a `Program` node.
    ///
    /// Always returns a tree; syntax errors are available afterwards through
    /// [`Parser::errors`]. Each call starts over from the beginning of the
    /// token source with an empty error list.
    pub fn parse(&mut self) -> AstNode {
        self.tokens.reset();
        self.errors.clear();
        self.depth = 0;
        self.current = self.tokens.next_token();
        self.previous = self.current.clone();

        let program = self.parse_program();
        debug!(
            "parsed {} top-level statement(s) with {} syntax error(s)",
            program.statements().map_or(0, |s| s.len()),
            self.errors.len() + self.errors.dropped()
        );
        program
    }

    /// Number of recorded syntax errors (not counting dropped ones)
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Syntax errors from the last parse, in the order they were found
    pub fn errors(&self) -> &[ParseError] {
        self.errors.as_slice()
    }

    /// The bounded error list, including the overflow count
    pub fn diagnostics(&self) -> &Diagnostics<ParseError> {
        &self.errors
    }

    fn parse_program(&mut self) -> AstNode {
        let location = self.current.location;
        let statements = self.parse_statement_list(false);
        AstNode::Program {
            statements,
            location,
        }
    }

    /// Parse statements until `}` (inside a block) or end of input.
    ///
    /// This is where recovery happens: a failed statement is reported and the
    /// parser synchronizes to the next statement boundary.
    pub(crate) fn parse_statement_list(&mut self, in_block: bool) -> Vec<AstNode> {
        let mut statements = Vec::new();

        while !self.is_at_end() && !(in_block && self.check(TokenKind::RBrace)) {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    self.report(err);
                    self.synchronize();
                }
            }
        }

        statements
    }

    // ===== Error recovery =====

    pub(crate) fn report(&mut self, err: ParseError) {
        debug!("syntax error at {}: {}", err.location, err.message);
        self.errors.push(err);
    }

    /// Discard tokens up to the next statement boundary.
    ///
    /// Stops in front of `{`, `}`, a statement keyword, or end of input, and
    /// consumes a boundary `;`.
    pub(crate) fn synchronize(&mut self) {
        let mut skipped = 0usize;
        while !self.current.kind.is_statement_boundary() {
            self.advance();
            skipped += 1;
        }
        if self.check(TokenKind::Semicolon) {
            self.advance();
            skipped += 1;
        }
        debug!(
            "synchronized at {} after skipping {} token(s)",
            self.current.location, skipped
        );
    }

    /// Skip the current token, or the whole bracketed group it opens
    fn skip_balanced(&mut self) {
        let mut open = 0usize;
        loop {
            match self.current.kind {
                TokenKind::Eof => return,
                TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => open += 1,
                TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    open = open.saturating_sub(1)
                }
                _ => {}
            }
            self.advance();
            if open == 0 {
                return;
            }
        }
    }

    /// Enter one nesting level; past the limit the offending group is skipped
    pub(crate) fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= self.config.max_depth {
            let err = self.error_at_current(SyntaxErrorKind::NestingTooDeep);
            self.skip_balanced();
            return Err(err);
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Expect the `;` ending a complete statement.
    ///
    /// A missing terminator is reported here and the statement is kept.
    pub(crate) fn expect_terminator(&mut self) {
        if self.match_kind(TokenKind::Semicolon) {
            return;
        }
        let err = if self.check(TokenKind::Equals) {
            self.error_at_current(SyntaxErrorKind::InvalidOperator)
        } else {
            self.error_at_previous(SyntaxErrorKind::MissingSemicolon)
        };
        self.report(err);
        self.synchronize();
    }

    // ===== Helper methods =====

    pub(crate) fn error_at_current(&self, kind: SyntaxErrorKind) -> ParseError {
        ParseError::new(kind, &self.current)
    }

    pub(crate) fn error_at_previous(&self, kind: SyntaxErrorKind) -> ParseError {
        ParseError::new(kind, &self.previous)
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub(crate) fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or fail with `error` reported at the current token
    pub(crate) fn expect(
        &mut self,
        kind: TokenKind,
        error: SyntaxErrorKind,
    ) -> Result<(), ParseError> {
        if self.match_kind(kind) {
            Ok(())
        } else {
            Err(self.error_at_current(error))
        }
    }

    /// Move to the next token. At end of input this is a no-op.
    pub(crate) fn advance(&mut self) {
        if self.is_at_end() {
            return;
        }
        let next = self.tokens.next_token();
        self.previous = std::mem::replace(&mut self.current, next);
        trace!("consumed {}", self.previous);
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }
}

/// Parse source text, returning the tree and the syntax errors
pub fn parse_source(source: &str) -> (AstNode, Vec<ParseError>) {
    let mut parser = Parser::new(source);
    let program = parser.parse();
    (program, parser.errors.into_vec())
}

/// Parse a pre-lexed token sequence, returning the tree and the syntax errors
pub fn parse_tokens(tokens: Vec<Token>) -> (AstNode, Vec<ParseError>) {
    let mut parser = Parser::from_tokens(tokens);
    let program = parser.parse();
    (program, parser.errors.into_vec())
}
