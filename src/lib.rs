//! # Introduction
//!
//! minic is the front end of a compiler for a small imperative teaching
//! language: integer scalars and arrays, `if`, `while`, `repeat ... until`,
//! `print`, and `factorial(...)`. It lexes and parses source text into an
//! AST, recovering from syntax errors, then runs a scoped semantic analysis.
//! The results can be browsed in a terminal UI built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Semantic Analyzer → Diagnostics → CLI / TUI
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST, collecting syntax
//!    errors instead of stopping at the first one.
//! 2. [`semantic`]: checks declarations, scoping, initialization and array
//!    usage against a [`semantic::SymbolTable`].
//! 3. [`diagnostics`]: the bounded error lists both phases report into.
//! 4. [`ui`]: ratatui-based inspector; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! let (program, syntax_errors) = minic::parser::parse_source("int x; x = 2; print x * 3;");
//! assert!(syntax_errors.is_empty());
//!
//! let report = minic::semantic::analyze(&program);
//! assert!(report.passed);
//! ```

pub mod constants;
pub mod diagnostics;
pub mod parser;
pub mod semantic;
pub mod ui;
