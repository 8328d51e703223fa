//! Semantic diagnostics
//!
//! Every semantic problem is a [`SemanticError`] with a [`SemanticErrorKind`].
//! Only [`SemanticErrorKind::Uninitialized`] is a warning; everything else
//! fails analysis.

use crate::diagnostics::Diagnostic;
use crate::parser::ast::SourceLocation;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Semantic error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticErrorKind {
    Undeclared,
    Redeclared,
    TypeMismatch,
    Uninitialized,
    InvalidOperation,
    InvalidArraySize,
    NotAnArray,
    ArrayIndexOutOfBounds,
    ArrayAssignment,
    DivideByZero,
}

impl SemanticErrorKind {
    pub fn severity(self) -> Severity {
        match self {
            SemanticErrorKind::Uninitialized => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// A semantic diagnostic with its position in the source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub message: String,
    pub location: SourceLocation,
}

impl SemanticError {
    pub fn new(kind: SemanticErrorKind, message: impl Into<String>, location: SourceLocation) -> Self {
        SemanticError {
            kind,
            message: message.into(),
            location,
        }
    }

    pub fn undeclared(name: &str, location: SourceLocation) -> Self {
        Self::new(
            SemanticErrorKind::Undeclared,
            format!("Undeclared variable '{}'", name),
            location,
        )
    }

    pub fn redeclared(name: &str, previous_line: usize, location: SourceLocation) -> Self {
        Self::new(
            SemanticErrorKind::Redeclared,
            format!(
                "Variable '{}' already declared in this scope (line {})",
                name, previous_line
            ),
            location,
        )
    }

    pub fn uninitialized(name: &str, location: SourceLocation) -> Self {
        Self::new(
            SemanticErrorKind::Uninitialized,
            format!("Variable '{}' may be used uninitialized", name),
            location,
        )
    }

    pub fn array_as_scalar(name: &str, location: SourceLocation) -> Self {
        Self::new(
            SemanticErrorKind::TypeMismatch,
            format!("Array '{}' used as a scalar value", name),
            location,
        )
    }

    pub fn not_an_array(name: &str, location: SourceLocation) -> Self {
        Self::new(
            SemanticErrorKind::NotAnArray,
            format!("Variable '{}' is not an array", name),
            location,
        )
    }

    pub fn invalid_array_size(name: &str, location: SourceLocation) -> Self {
        Self::new(
            SemanticErrorKind::InvalidArraySize,
            format!("Invalid size for array '{}': expected a positive integer literal", name),
            location,
        )
    }

    pub fn index_out_of_bounds(name: &str, index: i64, len: usize, location: SourceLocation) -> Self {
        Self::new(
            SemanticErrorKind::ArrayIndexOutOfBounds,
            format!(
                "Array index out of bounds for array '{}': index {} but size is {}",
                name, index, len
            ),
            location,
        )
    }

    pub fn array_assignment(name: &str, location: SourceLocation) -> Self {
        Self::new(
            SemanticErrorKind::ArrayAssignment,
            format!("Cannot assign to array '{}' directly", name),
            location,
        )
    }

    pub fn divide_by_zero(location: SourceLocation) -> Self {
        Self::new(
            SemanticErrorKind::DivideByZero,
            "Division by constant zero",
            location,
        )
    }

    pub fn invalid_operation(what: impl Into<String>, location: SourceLocation) -> Self {
        Self::new(SemanticErrorKind::InvalidOperation, what, location)
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl Diagnostic for SemanticError {
    fn location(&self) -> SourceLocation {
        self.location
    }

    fn label(&self) -> &'static str {
        match self.severity() {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_uninitialized_is_a_warning() {
        let loc = SourceLocation::new(2, 7);
        assert!(SemanticError::uninitialized("x", loc).is_warning());
        assert!(!SemanticError::undeclared("x", loc).is_warning());
        assert_eq!(SemanticError::uninitialized("x", loc).label(), "Warning");
        assert_eq!(SemanticError::divide_by_zero(loc).label(), "Error");
    }

    #[test]
    fn test_messages() {
        let loc = SourceLocation::new(1, 1);
        assert_eq!(
            SemanticError::undeclared("y", loc).to_string(),
            "Undeclared variable 'y'"
        );
        assert_eq!(
            SemanticError::array_assignment("a", loc).to_string(),
            "Cannot assign to array 'a' directly"
        );
    }
}
