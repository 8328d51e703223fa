//! Semantic analysis
//!
//! Checks a parsed program for declaration, scoping, initialization and array
//! usage problems:
//! - [`symbols`]: scoped symbol table
//! - [`analyzer`]: the tree walk that produces diagnostics
//! - [`errors`]: semantic diagnostic types

pub mod analyzer;
pub mod errors;
pub mod symbols;

pub use analyzer::{analyze, AnalysisReport, SemanticAnalyzer};
pub use errors::{SemanticError, SemanticErrorKind, Severity};
pub use symbols::{RedeclarationError, Symbol, SymbolShape, SymbolTable};
