//! Semantic analysis over a parsed program
//!
//! [`SemanticAnalyzer`] walks the tree once, maintaining a [`SymbolTable`] and
//! collecting [`SemanticError`]s. It never stops at the first problem.
//!
//! # Scoping Rules
//!
//! - The program is scope level 0.
//! - `if` and `while` bodies, and `repeat` bodies, each run in a fresh scope.
//!   A single-statement `if` body gets one too.
//! - A bare `{ ... }` statement does not open a scope of its own; its
//!   statements belong to the enclosing scope.
//! - A `repeat` condition is checked after the body, in the enclosing scope.
//!
//! Initialization is tracked flow-insensitively: once any assignment to a
//! variable has been seen, later reads of it are not flagged.

use super::errors::SemanticError;
use super::symbols::{SymbolShape, SymbolTable};
use crate::constants::MAX_ERRORS;
use crate::diagnostics::Diagnostics;
use crate::parser::ast::{AstNode, BinOp, SourceLocation};
use log::{debug, trace};

/// Result of a full analysis run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    /// `true` when no hard errors were found
    pub passed: bool,
    pub errors: Vec<SemanticError>,
    pub warnings: Vec<SemanticError>,
    /// Diagnostics reported after a list filled up
    pub dropped: usize,
}

/// Semantic analyzer
pub struct SemanticAnalyzer {
    symbols: SymbolTable,
    errors: Diagnostics<SemanticError>,
    warnings: Diagnostics<SemanticError>,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self::with_error_limit(MAX_ERRORS)
    }

    /// Analyzer whose error and warning lists each hold at most `limit` entries
    pub fn with_error_limit(limit: usize) -> Self {
        SemanticAnalyzer {
            symbols: SymbolTable::new(),
            errors: Diagnostics::with_capacity(limit),
            warnings: Diagnostics::with_capacity(limit),
        }
    }

    /// Analyze a tree. Returns `true` if it has no semantic errors.
    ///
    /// Warnings do not affect the result. Each call starts from an empty
    /// symbol table and empty diagnostic lists.
    pub fn analyze(&mut self, root: &AstNode) -> bool {
        self.symbols = SymbolTable::new();
        self.errors.clear();
        self.warnings.clear();

        self.check_statement(root);

        debug!(
            "analysis finished: {} error(s), {} warning(s)",
            self.errors.len() + self.errors.dropped(),
            self.warnings.len() + self.warnings.dropped()
        );
        self.errors.is_empty() && !self.errors.is_truncated()
    }

    /// Hard errors from the last run, in report order
    pub fn errors(&self) -> &[SemanticError] {
        self.errors.as_slice()
    }

    pub fn warnings(&self) -> &[SemanticError] {
        self.warnings.as_slice()
    }

    pub fn error_diagnostics(&self) -> &Diagnostics<SemanticError> {
        &self.errors
    }

    pub fn warning_diagnostics(&self) -> &Diagnostics<SemanticError> {
        &self.warnings
    }

    /// Package the results of the last run
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            passed: self.errors.is_empty() && !self.errors.is_truncated(),
            errors: self.errors.as_slice().to_vec(),
            warnings: self.warnings.as_slice().to_vec(),
            dropped: self.errors.dropped() + self.warnings.dropped(),
        }
    }

    fn report_error(&mut self, err: SemanticError) {
        if err.is_warning() {
            debug!("warning at {}: {}", err.location, err.message);
            self.warnings.push(err);
        } else {
            debug!("semantic error at {}: {}", err.location, err.message);
            self.errors.push(err);
        }
    }

    // ===== Statements =====

    fn check_statement(&mut self, node: &AstNode) {
        trace!("checking {} at {}", node.kind_name(), node.location());

        match node {
            AstNode::Program { statements, .. } | AstNode::Block { statements, .. } => {
                for stmt in statements {
                    self.check_statement(stmt);
                }
            }
            AstNode::VarDecl { name, location } => {
                self.declare(name, SymbolShape::Scalar, *location);
            }
            AstNode::ArrayDecl {
                name,
                size,
                location,
            } => match Self::array_length(size) {
                Some(len) => self.declare(name, SymbolShape::Array { len }, *location),
                None => self.report_error(SemanticError::invalid_array_size(name, *location)),
            },
            AstNode::Assign { target, value, .. } => {
                let value_ok = self.check_expression(value);
                self.check_assignment_target(target, value_ok);
            }
            AstNode::If {
                condition, body, ..
            }
            | AstNode::While {
                condition, body, ..
            } => {
                self.check_expression(condition);
                self.check_scoped_body(body);
            }
            AstNode::RepeatUntil {
                body, condition, ..
            } => {
                self.check_scoped_body(body);
                self.check_expression(condition);
            }
            AstNode::Print { expr, .. } => {
                self.check_expression(expr);
            }
            other => self.report_error(SemanticError::invalid_operation(
                format!("Invalid operation: {} used as a statement", other.kind_name()),
                *other.location(),
            )),
        }
    }

    /// Check a loop or branch body inside its own scope
    fn check_scoped_body(&mut self, body: &AstNode) {
        self.symbols.enter_scope();
        match body {
            AstNode::Block { statements, .. } => {
                for stmt in statements {
                    self.check_statement(stmt);
                }
            }
            other => self.check_statement(other),
        }
        self.symbols.exit_scope();
    }

    fn declare(&mut self, name: &str, shape: SymbolShape, location: SourceLocation) {
        let declared = self.symbols.declare(name, shape, location.line).map(|_| ());
        if let Err(err) = declared {
            self.report_error(SemanticError::redeclared(name, err.previous_line, location));
        }
    }

    /// Positive integer literal size, if the declaration has one
    fn array_length(size: &AstNode) -> Option<usize> {
        match size {
            AstNode::Number(n, _) if *n > 0 => usize::try_from(*n).ok(),
            _ => None,
        }
    }

    /// Check the left side of an assignment. The target only becomes
    /// initialized when `value_ok` holds and the target itself is valid.
    fn check_assignment_target(&mut self, target: &AstNode, value_ok: bool) {
        match target {
            AstNode::Identifier(name, location) => match self.symbols.lookup(name).map(|s| s.shape) {
                None => self.report_error(SemanticError::undeclared(name, *location)),
                Some(SymbolShape::Array { .. }) => {
                    self.report_error(SemanticError::array_assignment(name, *location))
                }
                Some(SymbolShape::Scalar) => {
                    if value_ok {
                        self.symbols.mark_initialized(name);
                    }
                }
            },
            AstNode::ArrayAccess {
                name,
                index,
                location,
            } => {
                if self.check_array_access(name, index, *location) && value_ok {
                    self.symbols.mark_initialized(name);
                }
            }
            other => self.report_error(SemanticError::invalid_operation(
                format!("Invalid operation: cannot assign to {}", other.kind_name()),
                *other.location(),
            )),
        }
    }

    // ===== Expressions =====

    /// Check an expression. Returns `false` if it produced a hard error;
    /// warnings leave it valid.
    fn check_expression(&mut self, node: &AstNode) -> bool {
        match node {
            AstNode::Number(..) => true,
            AstNode::Identifier(name, location) => {
                match self.symbols.lookup(name).map(|s| (s.shape, s.initialized)) {
                    None => {
                        self.report_error(SemanticError::undeclared(name, *location));
                        false
                    }
                    Some((SymbolShape::Array { .. }, _)) => {
                        self.report_error(SemanticError::array_as_scalar(name, *location));
                        false
                    }
                    Some((SymbolShape::Scalar, false)) => {
                        self.report_error(SemanticError::uninitialized(name, *location));
                        true
                    }
                    Some((SymbolShape::Scalar, true)) => true,
                }
            }
            AstNode::ArrayAccess {
                name,
                index,
                location,
            } => self.check_array_access(name, index, *location),
            AstNode::BinaryOp {
                op,
                left,
                right,
                location,
            } => {
                let left_ok = self.check_expression(left);
                let right_ok = self.check_expression(right);
                if *op == BinOp::Div && matches!(**right, AstNode::Number(0, _)) {
                    self.report_error(SemanticError::divide_by_zero(*location));
                    return false;
                }
                left_ok && right_ok
            }
            AstNode::Factorial { operand, .. } => self.check_expression(operand),
            other => {
                self.report_error(SemanticError::invalid_operation(
                    format!("Invalid operation: {} used as a value", other.kind_name()),
                    *other.location(),
                ));
                false
            }
        }
    }

    /// Check `name[index]`. Returns `true` if `name` is a declared array, the
    /// index is valid, and a literal index is in bounds.
    ///
    /// The base name is resolved before the index is checked.
    fn check_array_access(&mut self, name: &str, index: &AstNode, location: SourceLocation) -> bool {
        let len = match self.symbols.lookup(name).map(|sym| sym.shape) {
            None => {
                self.report_error(SemanticError::undeclared(name, location));
                self.check_expression(index);
                return false;
            }
            Some(SymbolShape::Scalar) => {
                self.report_error(SemanticError::not_an_array(name, location));
                self.check_expression(index);
                return false;
            }
            Some(SymbolShape::Array { len }) => len,
        };

        if !self.check_expression(index) {
            return false;
        }

        if let AstNode::Number(value, index_location) = index {
            let in_bounds = usize::try_from(*value).is_ok_and(|i| i < len);
            if !in_bounds {
                self.report_error(SemanticError::index_out_of_bounds(
                    name,
                    *value,
                    len,
                    *index_location,
                ));
                return false;
            }
        }

        true
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyze a tree with default limits
pub fn analyze(root: &AstNode) -> AnalysisReport {
    let mut analyzer = SemanticAnalyzer::new();
    analyzer.analyze(root);
    analyzer.report()
}
