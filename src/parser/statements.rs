//! Statement parsing implementation
//!
//! This module handles parsing of all minic statement types:
//!
//! - Assignments: `x = 1;`, `a[i] = x;`
//! - Control flow: `if`, `while`, `repeat ... until`
//! - Output: `print expr;`
//! - Blocks: `{ ... }`
//!
//! Declarations live in `declarations`.
//!
//! # Grammar
//!
//! ```text
//! statement  ::= declaration | assignment | if_stmt | while_stmt
//!              | repeat_stmt | print_stmt | block
//! assignment ::= IDENTIFIER ( "[" expr "]" )? "=" expr ";"
//! if_stmt    ::= "if" "(" expr ")" ( block | statement )
//! while_stmt ::= "while" "(" expr ")" block
//! repeat_stmt::= "repeat" block "until" "(" expr ")" ";"?
//! print_stmt ::= "print" expr ";"
//! block      ::= "{" statement* "}"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{TokenKind, TokenSource};
use crate::parser::parse::{ParseError, Parser, SyntaxErrorKind};

impl<S: TokenSource> Parser<S> {
    /// Parse a statement, counting it against the nesting limit
    pub(crate) fn parse_statement(&mut self) -> Result<AstNode, ParseError> {
        self.descend()?;
        let result = self.parse_statement_kind();
        self.ascend();
        result
    }

    fn parse_statement_kind(&mut self) -> Result<AstNode, ParseError> {
        match self.current.kind {
            TokenKind::Int => self.parse_declaration(),
            TokenKind::Identifier => self.parse_assignment(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Repeat => self.parse_repeat_statement(),
            TokenKind::Print => self.parse_print_statement(),
            TokenKind::LBrace => self.parse_block(),
            _ => {
                // Consume the token so the caller always makes progress
                let err = self.error_at_current(SyntaxErrorKind::UnexpectedToken);
                self.advance();
                Err(err)
            }
        }
    }

    /// Parse a braced block
    pub(crate) fn parse_block(&mut self) -> Result<AstNode, ParseError> {
        let location = self.current.location;
        self.expect(TokenKind::LBrace, SyntaxErrorKind::MissingBlockBraces)?;

        let statements = self.parse_statement_list(true);

        if !self.match_kind(TokenKind::RBrace) {
            return Err(self.error_at_current(SyntaxErrorKind::MissingBlockBraces));
        }

        Ok(AstNode::Block {
            statements,
            location,
        })
    }

    /// Parse assignment to a variable or array element
    fn parse_assignment(&mut self) -> Result<AstNode, ParseError> {
        let location = self.current.location;
        let name = self.current.lexeme.clone();
        self.advance();

        let target = if self.check(TokenKind::LBracket) {
            self.parse_array_index(name, location)?
        } else {
            AstNode::Identifier(name, location)
        };

        if !self.match_kind(TokenKind::Equals) {
            return Err(self.error_at_previous(SyntaxErrorKind::MissingEquals));
        }

        let value = self.parse_expression()?;
        let node = AstNode::Assign {
            target: Box::new(target),
            value: Box::new(value),
            location,
        };

        self.expect_terminator();
        Ok(node)
    }

    /// Parse if statement; the body may be a block or a single statement
    fn parse_if_statement(&mut self) -> Result<AstNode, ParseError> {
        let location = self.current.location;
        self.advance(); // consume 'if'

        let condition = self.parse_condition()?;
        let body = if self.check(TokenKind::LBrace) {
            self.parse_block()?
        } else {
            self.parse_statement()?
        };

        Ok(AstNode::If {
            condition: Box::new(condition),
            body: Box::new(body),
            location,
        })
    }

    /// Parse while loop
    fn parse_while_statement(&mut self) -> Result<AstNode, ParseError> {
        let location = self.current.location;
        self.advance(); // consume 'while'

        let condition = self.parse_condition()?;
        if !self.check(TokenKind::LBrace) {
            return Err(self.error_at_previous(SyntaxErrorKind::MissingBlockBraces));
        }
        let body = self.parse_block()?;

        Ok(AstNode::While {
            condition: Box::new(condition),
            body: Box::new(body),
            location,
        })
    }

    /// Parse repeat-until loop. The trailing `;` is optional.
    fn parse_repeat_statement(&mut self) -> Result<AstNode, ParseError> {
        let location = self.current.location;
        self.advance(); // consume 'repeat'

        if !self.check(TokenKind::LBrace) {
            return Err(self.error_at_previous(SyntaxErrorKind::MissingBlockBraces));
        }
        let body = self.parse_block()?;

        if !self.match_kind(TokenKind::Until) {
            return Err(self.error_at_previous(SyntaxErrorKind::MissingCondition));
        }
        let condition = self.parse_condition()?;
        self.match_kind(TokenKind::Semicolon);

        Ok(AstNode::RepeatUntil {
            body: Box::new(body),
            condition: Box::new(condition),
            location,
        })
    }

    /// Parse print statement
    fn parse_print_statement(&mut self) -> Result<AstNode, ParseError> {
        let location = self.current.location;
        self.advance(); // consume 'print'

        if self.check(TokenKind::Semicolon) || self.is_at_end() {
            return Err(self.error_at_previous(SyntaxErrorKind::MissingIdentifier));
        }

        let expr = self.parse_expression()?;
        let node = AstNode::Print {
            expr: Box::new(expr),
            location,
        };

        self.expect_terminator();
        Ok(node)
    }

    /// Parse a parenthesised loop or branch condition
    fn parse_condition(&mut self) -> Result<AstNode, ParseError> {
        if !self.match_kind(TokenKind::LParen) {
            return Err(self.error_at_current(SyntaxErrorKind::MissingParentheses));
        }
        if self.check(TokenKind::RParen) {
            return Err(self.error_at_previous(SyntaxErrorKind::MissingCondition));
        }

        let condition = self.parse_expression()?;

        if self.check(TokenKind::Equals) {
            return Err(self
                .error_at_current(SyntaxErrorKind::InvalidOperator)
                .with_message("Invalid operator '=' in condition, did you mean '=='?"));
        }
        self.expect(TokenKind::RParen, SyntaxErrorKind::MissingParentheses)?;

        Ok(condition)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::{Parser, SyntaxErrorKind};

    fn parse_ok(source: &str) -> Vec<AstNode> {
        let mut parser = Parser::new(source);
        let program = parser.parse();
        assert!(
            !parser.has_errors(),
            "unexpected errors: {:?}",
            parser.errors()
        );
        program.statements().unwrap().to_vec()
    }

    fn first_error(source: &str) -> SyntaxErrorKind {
        let mut parser = Parser::new(source);
        parser.parse();
        parser.errors()[0].kind
    }

    #[test]
    fn test_if_with_single_statement_body() {
        let statements = parse_ok("if (x < 1) x = 2;");
        match &statements[0] {
            AstNode::If { condition, body, .. } => {
                assert!(matches!(**condition, AstNode::BinaryOp { op: BinOp::Lt, .. }));
                assert!(matches!(**body, AstNode::Assign { .. }));
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_while_with_block() {
        let statements = parse_ok("while (i != 10) { i = i + 1; print i; }");
        match &statements[0] {
            AstNode::While { body, .. } => {
                assert_eq!(body.statements().unwrap().len(), 2);
            }
            other => panic!("expected while, got {:?}", other),
        }
    }

    #[test]
    fn test_repeat_until_optional_semicolon() {
        let with = parse_ok("repeat { x = x - 1; } until (x == 0);");
        let without = parse_ok("repeat { x = x - 1; } until (x == 0)");
        assert!(matches!(with[0], AstNode::RepeatUntil { .. }));
        assert_eq!(with, without);
    }

    #[test]
    fn test_array_element_assignment() {
        let statements = parse_ok("a[i + 1] = 5;");
        match &statements[0] {
            AstNode::Assign { target, .. } => {
                assert!(matches!(&**target, AstNode::ArrayAccess { name, .. } if name == "a"));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_blocks() {
        let statements = parse_ok("{ { int x; } print 1; }");
        let outer = statements[0].statements().unwrap();
        assert_eq!(outer.len(), 2);
        assert!(matches!(outer[0], AstNode::Block { .. }));
    }

    #[test]
    fn test_statement_errors() {
        assert_eq!(first_error("x 5;"), SyntaxErrorKind::MissingEquals);
        assert_eq!(first_error("if x < 1 { }"), SyntaxErrorKind::MissingParentheses);
        assert_eq!(first_error("if () { }"), SyntaxErrorKind::MissingCondition);
        assert_eq!(first_error("while (x) x = 1;"), SyntaxErrorKind::MissingBlockBraces);
        assert_eq!(first_error("repeat x = 1; until (x);"), SyntaxErrorKind::MissingBlockBraces);
        assert_eq!(first_error("repeat { } (x);"), SyntaxErrorKind::MissingCondition);
        assert_eq!(first_error("print ;"), SyntaxErrorKind::MissingIdentifier);
        assert_eq!(first_error("if (x = 1) { }"), SyntaxErrorKind::InvalidOperator);
        assert_eq!(first_error("x = y = 1;"), SyntaxErrorKind::InvalidOperator);
        assert_eq!(first_error("}"), SyntaxErrorKind::UnexpectedToken);
    }

    #[test]
    fn test_unclosed_block_reports_braces() {
        let mut parser = Parser::new("{ int x;");
        let program = parser.parse();

        assert_eq!(parser.error_count(), 1);
        assert_eq!(parser.errors()[0].kind, SyntaxErrorKind::MissingBlockBraces);
        assert!(program.statements().unwrap().is_empty());
    }

    #[test]
    fn test_recovery_inside_block() {
        let mut parser = Parser::new("{ x = ; print 1; }");
        let program = parser.parse();

        assert_eq!(parser.error_count(), 1);
        assert_eq!(parser.errors()[0].kind, SyntaxErrorKind::InvalidExpression);
        let block = &program.statements().unwrap()[0];
        assert_eq!(block.statements().unwrap().len(), 1);
    }

    #[test]
    fn test_statement_locations() {
        let statements = parse_ok("int x;\nwhile (x < 3) {\n  x = x + 1;\n}");
        assert_eq!(*statements[1].location(), SourceLocation::new(2, 1));
    }
}
