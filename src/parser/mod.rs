//! minic source code parser
//!
//! This module transforms minic source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), error types and recovery
//! - [`ast`]: AST node definitions
//!
//! # The minic Language
//!
//! - Types: `int` scalars and fixed-size `int` arrays
//! - Statements: declarations, assignments, `if`, `while`, `repeat ... until`,
//!   `print`, and nested blocks
//! - Expressions: `+ - * /`, `< > == !=`, parentheses, array indexing,
//!   and `factorial(expr)`
//! - Comments: `// line` and `/* block */`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with one function per precedence tier.
//! Syntax errors are collected rather than fatal: the parser resynchronizes at
//! the next statement boundary and always produces a tree.

pub mod ast;
pub mod lexer;
pub mod parse;

mod declarations;
mod expressions;
mod statements;

pub use ast::{AstNode, BinOp, SourceLocation};
pub use lexer::{LexErrorKind, Lexer, Token, TokenBuffer, TokenKind, TokenSource};
pub use parse::{parse_source, parse_tokens, ParseError, Parser, ParserConfig, SyntaxErrorKind};
