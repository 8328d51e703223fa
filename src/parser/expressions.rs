//! Expression parsing implementation
//!
//! This module handles parsing of minic expressions using one function per
//! precedence tier and recursive descent for primary forms.
//!
//! # Supported Expressions
//!
//! - Literals: non-negative integers
//! - Identifiers and array elements: `x`, `a[i + 1]`
//! - `factorial(expr)`
//! - Parenthesised expressions
//! - Binary operators: `* /`, `+ -`, `< >`, `== !=`
//!
//! # Precedence
//!
//! From lowest to highest:
//!
//! ```text
//! expression     ::= equality
//! equality       ::= comparison ( ( "==" | "!=" ) comparison )*
//! comparison     ::= additive ( ( "<" | ">" ) additive )*
//! additive       ::= multiplicative ( ( "+" | "-" ) multiplicative )*
//! multiplicative ::= primary ( ( "*" | "/" ) primary )*
//! primary        ::= NUMBER | IDENTIFIER ( "[" expr "]" )?
//!                  | "factorial" "(" expr ")" | "(" expr ")"
//! ```
//!
//! Every binary tier is left-associative: `a - b - c` parses as `(a - b) - c`.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{TokenKind, TokenSource};
use crate::parser::parse::{ParseError, Parser, SyntaxErrorKind};

impl<S: TokenSource> Parser<S> {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        self.parse_equality()
    }

    /// Parse equality (==, !=)
    fn parse_equality(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_tier(&[BinOp::Eq, BinOp::Ne], Self::parse_comparison)
    }

    /// Parse comparison (<, >)
    fn parse_comparison(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_tier(&[BinOp::Lt, BinOp::Gt], Self::parse_additive)
    }

    /// Parse additive (+, -)
    fn parse_additive(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_tier(&[BinOp::Add, BinOp::Sub], Self::parse_multiplicative)
    }

    /// Parse multiplicative (*, /)
    fn parse_multiplicative(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_tier(&[BinOp::Mul, BinOp::Div], Self::parse_primary)
    }

    /// Left fold of `operand ( op operand )*` for one precedence tier.
    ///
    /// Each fold deepens the tree by one level, so it counts against the
    /// nesting cap like a parenthesis does.
    fn parse_binary_tier(
        &mut self,
        ops: &[BinOp],
        operand: fn(&mut Self) -> Result<AstNode, ParseError>,
    ) -> Result<AstNode, ParseError> {
        let mut left = operand(self)?;
        let mut folds = 0usize;

        let result = loop {
            let Some(op) = self.match_binary_op(ops) else {
                break Ok(left);
            };
            let loc = self.previous.location;
            if let Err(err) = self.descend() {
                break Err(err);
            }
            folds += 1;

            match operand(self) {
                Ok(right) => {
                    left = AstNode::BinaryOp {
                        op,
                        left: Box::new(left),
                        right: Box::new(right),
                        location: loc,
                    };
                }
                Err(err) => break Err(err),
            }
        };

        for _ in 0..folds {
            self.ascend();
        }
        result
    }

    /// Parse primary expression
    fn parse_primary(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current.location;

        match self.current.kind {
            TokenKind::Number => {
                let value = self.current.lexeme.parse::<i64>().map_err(|_| {
                    self.error_at_current(SyntaxErrorKind::InvalidExpression)
                        .with_message(format!(
                            "Number literal '{}' is out of range",
                            self.current.lexeme
                        ))
                })?;
                self.advance();
                Ok(AstNode::Number(value, loc))
            }
            TokenKind::Identifier => {
                let name = self.current.lexeme.clone();
                self.advance();
                if self.check(TokenKind::LBracket) {
                    self.parse_array_index(name, loc)
                } else {
                    Ok(AstNode::Identifier(name, loc))
                }
            }
            TokenKind::Factorial => {
                self.descend()?;
                let result = self.parse_factorial();
                self.ascend();
                result
            }
            TokenKind::LParen => {
                self.descend()?;
                let result = self.parse_parenthesized();
                self.ascend();
                result
            }
            _ => Err(self.error_at_current(SyntaxErrorKind::InvalidExpression)),
        }
    }

    /// Parse `[ expr ]` following an array name
    pub(crate) fn parse_array_index(
        &mut self,
        name: String,
        location: SourceLocation,
    ) -> Result<AstNode, ParseError> {
        self.descend()?;
        let result = self.parse_index_expression();
        self.ascend();

        Ok(AstNode::ArrayAccess {
            name,
            index: Box::new(result?),
            location,
        })
    }

    fn parse_index_expression(&mut self) -> Result<AstNode, ParseError> {
        self.expect(TokenKind::LBracket, SyntaxErrorKind::InvalidArrayIndex)?;
        if self.check(TokenKind::RBracket) {
            return Err(self.error_at_current(SyntaxErrorKind::InvalidArrayIndex));
        }

        let index = self.parse_expression()?;
        self.expect(TokenKind::RBracket, SyntaxErrorKind::InvalidArrayIndex)?;
        Ok(index)
    }

    /// Parse `factorial ( expr )`
    fn parse_factorial(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current.location;
        self.advance(); // consume 'factorial'

        if !self.match_kind(TokenKind::LParen) {
            return Err(self.error_at_previous(SyntaxErrorKind::MissingParentheses));
        }
        let operand = self.parse_expression()?;
        self.expect(TokenKind::RParen, SyntaxErrorKind::MissingParentheses)?;

        Ok(AstNode::Factorial {
            operand: Box::new(operand),
            location: loc,
        })
    }

    fn parse_parenthesized(&mut self) -> Result<AstNode, ParseError> {
        self.advance(); // consume '('
        let expr = self.parse_expression()?;
        self.expect(TokenKind::RParen, SyntaxErrorKind::MissingParentheses)?;
        Ok(expr)
    }

    /// Consume the current token if it is one of `ops`
    fn match_binary_op(&mut self, ops: &[BinOp]) -> Option<BinOp> {
        let op = match self.current.kind {
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Less => BinOp::Lt,
            TokenKind::Greater => BinOp::Gt,
            TokenKind::EqualEqual => BinOp::Eq,
            TokenKind::NotEqual => BinOp::Ne,
            _ => return None,
        };

        if ops.contains(&op) {
            self.advance();
            Some(op)
        } else {
            None
        }
    }
}
