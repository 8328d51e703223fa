//! Lexically scoped symbol table
//!
//! This module provides the symbol storage used during semantic analysis:
//! - [`SymbolTable`]: active declarations plus a scope stack
//! - [`Symbol`]: one declaration with its shape and initialization state
//! - [`SymbolShape`]: scalar `int` or `int` array of known length
//!
//! # Scoping
//!
//! Each name maps to a stack of declarations, innermost last, so a lookup is
//! a single hash probe. Every scope remembers the names it declared; leaving
//! the scope pops exactly those entries, which un-shadows outer declarations.

use log::debug;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Declared shape of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolShape {
    Scalar,
    Array { len: usize },
}

impl SymbolShape {
    pub fn is_array(self) -> bool {
        matches!(self, SymbolShape::Array { .. })
    }
}

/// A declared variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub shape: SymbolShape,
    pub scope_level: usize,
    pub line: usize,
    pub initialized: bool,
}

/// Attempt to declare a name twice at the same scope level
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{name}' is already declared at scope level {scope_level} (line {previous_line})")]
pub struct RedeclarationError {
    pub name: String,
    pub scope_level: usize,
    pub previous_line: usize,
}

#[derive(Debug, Clone, Default)]
struct ScopeData {
    declared: Vec<String>,
}

/// Symbol table with nested scopes. Level 0 is the program scope.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: FxHashMap<String, Vec<Symbol>>,
    scope_stack: Vec<ScopeData>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            symbols: FxHashMap::default(),
            scope_stack: vec![ScopeData::default()],
        }
    }

    /// Current nesting level, 0 at program scope
    pub fn current_scope(&self) -> usize {
        self.scope_stack.len() - 1
    }

    /// Number of active symbols, shadowed ones included
    pub fn len(&self) -> usize {
        self.symbols.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Enter a new scope
    pub fn enter_scope(&mut self) {
        self.scope_stack.push(ScopeData::default());
        debug!("entered scope {}", self.current_scope());
    }

    /// Exit the current scope, removing every symbol declared in it.
    ///
    /// Exiting the program scope empties it and leaves the level at 0.
    pub fn exit_scope(&mut self) {
        let level = self.current_scope();
        let scope = self.scope_stack.pop().unwrap_or_default();

        for name in &scope.declared {
            if let Some(stack) = self.symbols.get_mut(name) {
                stack.pop();
                if stack.is_empty() {
                    self.symbols.remove(name);
                }
            }
        }

        if self.scope_stack.is_empty() {
            self.scope_stack.push(ScopeData::default());
        }
        debug!(
            "exited scope {} ({} symbol(s) removed)",
            level,
            scope.declared.len()
        );
    }

    /// Declare `name` at the current scope level, uninitialized
    pub fn declare(
        &mut self,
        name: &str,
        shape: SymbolShape,
        line: usize,
    ) -> Result<&Symbol, RedeclarationError> {
        let scope_level = self.current_scope();

        if let Some(existing) = self.lookup_current_scope(name) {
            return Err(RedeclarationError {
                name: name.to_string(),
                scope_level,
                previous_line: existing.line,
            });
        }

        if let Some(scope) = self.scope_stack.last_mut() {
            scope.declared.push(name.to_string());
        }

        let stack = self.symbols.entry(name.to_string()).or_default();
        stack.push(Symbol {
            name: name.to_string(),
            shape,
            scope_level,
            line,
            initialized: false,
        });

        debug!("declared '{}' as {:?} at scope {}", name, shape, scope_level);
        // Just pushed, so the stack is non-empty
        Ok(&stack[stack.len() - 1])
    }

    /// Innermost active declaration of `name`
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name).and_then(|stack| stack.last())
    }

    /// Declaration of `name` made at the current scope level, if any
    pub fn lookup_current_scope(&self, name: &str) -> Option<&Symbol> {
        let level = self.current_scope();
        self.lookup(name).filter(|sym| sym.scope_level == level)
    }

    /// Set the initialized flag on the innermost declaration of `name`.
    /// Returns `false` if the name is not declared.
    pub fn mark_initialized(&mut self, name: &str) -> bool {
        match self.symbols.get_mut(name).and_then(|stack| stack.last_mut()) {
            Some(sym) => {
                sym.initialized = true;
                true
            }
            None => false,
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_lookup() {
        let mut table = SymbolTable::new();
        table.declare("x", SymbolShape::Scalar, 1).unwrap();
        table
            .declare("a", SymbolShape::Array { len: 4 }, 2)
            .unwrap();

        assert_eq!(table.len(), 2);
        let a = table.lookup("a").unwrap();
        assert_eq!(a.shape, SymbolShape::Array { len: 4 });
        assert!(!a.initialized);
        assert!(table.lookup("missing").is_none());
    }

    #[test]
    fn test_redeclaration_same_scope() {
        let mut table = SymbolTable::new();
        table.declare("x", SymbolShape::Scalar, 1).unwrap();
        let err = table.declare("x", SymbolShape::Scalar, 3).unwrap_err();

        assert_eq!(err.name, "x");
        assert_eq!(err.scope_level, 0);
        assert_eq!(err.previous_line, 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_shadowing_and_purge() {
        let mut table = SymbolTable::new();
        table.declare("x", SymbolShape::Scalar, 1).unwrap();
        table.mark_initialized("x");

        table.enter_scope();
        table.declare("x", SymbolShape::Array { len: 2 }, 2).unwrap();
        table.declare("y", SymbolShape::Scalar, 3).unwrap();
        assert_eq!(table.current_scope(), 1);
        assert_eq!(table.lookup("x").unwrap().scope_level, 1);
        assert!(!table.lookup("x").unwrap().initialized);

        table.exit_scope();
        assert_eq!(table.current_scope(), 0);
        let x = table.lookup("x").unwrap();
        assert_eq!(x.scope_level, 0);
        assert!(x.initialized);
        assert!(table.lookup("y").is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_lookup_current_scope_ignores_outer() {
        let mut table = SymbolTable::new();
        table.declare("x", SymbolShape::Scalar, 1).unwrap();
        table.enter_scope();

        assert!(table.lookup_current_scope("x").is_none());
        assert!(table.lookup("x").is_some());
    }

    #[test]
    fn test_mark_initialized_unknown() {
        let mut table = SymbolTable::new();
        assert!(!table.mark_initialized("ghost"));
    }

    #[test]
    fn test_exit_program_scope() {
        let mut table = SymbolTable::new();
        table.declare("x", SymbolShape::Scalar, 1).unwrap();
        table.exit_scope();

        assert_eq!(table.current_scope(), 0);
        assert!(table.is_empty());
    }
}
