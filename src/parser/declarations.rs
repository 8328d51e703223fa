//! Declaration parsing implementation
//!
//! minic has a single declared type, so this module only handles the two
//! forms of `int` declaration:
//!
//! - Variables: `int x;`
//! - Arrays: `int a[10];`
//!
//! # Grammar
//!
//! ```text
//! declaration ::= "int" IDENTIFIER ( "[" expr "]" )? ";"
//! ```
//!
//! The array size is parsed as a full expression; whether it is a usable
//! constant is decided by semantic analysis.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{TokenKind, TokenSource};
use crate::parser::parse::{ParseError, Parser, SyntaxErrorKind};

impl<S: TokenSource> Parser<S> {
    /// Parse an `int` variable or array declaration
    pub(crate) fn parse_declaration(&mut self) -> Result<AstNode, ParseError> {
        self.advance(); // consume 'int'

        if !self.check(TokenKind::Identifier) {
            return Err(self.error_at_previous(SyntaxErrorKind::MissingIdentifier));
        }
        let location = self.current.location;
        let name = self.current.lexeme.clone();
        self.advance();

        let node = if self.match_kind(TokenKind::LBracket) {
            let size = self.parse_array_size()?;
            AstNode::ArrayDecl {
                name,
                size: Box::new(size),
                location,
            }
        } else {
            AstNode::VarDecl { name, location }
        };

        self.expect_terminator();
        Ok(node)
    }

    /// Parse `expr ]` after the opening bracket of an array declaration
    fn parse_array_size(&mut self) -> Result<AstNode, ParseError> {
        if self.check(TokenKind::RBracket) {
            return Err(self.error_at_current(SyntaxErrorKind::InvalidArraySize));
        }

        let size = self.parse_expression()?;
        self.expect(TokenKind::RBracket, SyntaxErrorKind::InvalidArraySize)?;
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::{Parser, SyntaxErrorKind};

    #[test]
    fn test_variable_declaration() {
        let mut parser = Parser::new("int count;");
        let program = parser.parse();

        assert!(!parser.has_errors());
        assert_eq!(
            program.statements().unwrap()[0],
            AstNode::VarDecl {
                name: "count".to_string(),
                location: SourceLocation::new(1, 5),
            }
        );
    }

    #[test]
    fn test_array_declaration() {
        let mut parser = Parser::new("int a[2 * 5];");
        let program = parser.parse();

        assert!(!parser.has_errors());
        match &program.statements().unwrap()[0] {
            AstNode::ArrayDecl { name, size, .. } => {
                assert_eq!(name, "a");
                assert!(matches!(**size, AstNode::BinaryOp { op: BinOp::Mul, .. }));
            }
            other => panic!("expected array declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_identifier() {
        let mut parser = Parser::new("int 5; int y;");
        let program = parser.parse();

        assert_eq!(parser.error_count(), 1);
        let err = &parser.errors()[0];
        assert_eq!(err.kind, SyntaxErrorKind::MissingIdentifier);
        assert_eq!(err.message, "Missing identifier after 'int'");
        assert_eq!(program.statements().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_array_size() {
        let mut parser = Parser::new("int a[]; print 1;");
        let program = parser.parse();

        assert_eq!(parser.error_count(), 1);
        assert_eq!(parser.errors()[0].kind, SyntaxErrorKind::InvalidArraySize);
        assert_eq!(program.statements().unwrap().len(), 1);
    }

    #[test]
    fn test_unclosed_array_size() {
        let mut parser = Parser::new("int a[3;");
        parser.parse();

        assert_eq!(parser.error_count(), 1);
        assert_eq!(parser.errors()[0].kind, SyntaxErrorKind::InvalidArraySize);
    }

    #[test]
    fn test_reserved_type_keyword_is_not_a_declaration() {
        let mut parser = Parser::new("float f;");
        parser.parse();

        assert_eq!(parser.errors()[0].kind, SyntaxErrorKind::UnexpectedToken);
        assert_eq!(parser.errors()[0].message, "Unexpected 'float'");
    }
}
