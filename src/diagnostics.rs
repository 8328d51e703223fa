//! Bounded, ordered diagnostic lists
//!
//! Both the parser and the semantic analyzer accumulate errors and keep going.
//! [`Diagnostics`] stores them in report order up to a fixed capacity; anything
//! reported after that is dropped but counted, so callers can tell a complete
//! report from a truncated one with [`Diagnostics::is_truncated`].

use crate::constants::MAX_ERRORS;
use crate::parser::ast::SourceLocation;
use std::fmt;

/// Anything that can be listed in a diagnostic report
pub trait Diagnostic: fmt::Display {
    fn location(&self) -> SourceLocation;

    /// Leading word of a report line
    fn label(&self) -> &'static str {
        "Error"
    }
}

/// An ordered error list with a fixed capacity
#[derive(Debug, Clone)]
pub struct Diagnostics<E> {
    items: Vec<E>,
    capacity: usize,
    dropped: usize,
}

impl<E> Diagnostics<E> {
    pub fn new() -> Self {
        Self::with_capacity(MAX_ERRORS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Diagnostics {
            items: Vec::new(),
            capacity,
            dropped: 0,
        }
    }

    /// Record a diagnostic. Returns `false` if the list was already full.
    pub fn push(&mut self, item: E) -> bool {
        if self.items.len() >= self.capacity {
            self.dropped += 1;
            return false;
        }
        self.items.push(item);
        true
    }

    /// Forget everything recorded so far, keeping the capacity
    pub fn clear(&mut self) {
        self.items.clear();
        self.dropped = 0;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Number of diagnostics reported after the list filled up
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn is_truncated(&self) -> bool {
        self.dropped > 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<E> {
        self.items
    }
}

impl<E> Default for Diagnostics<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, E> IntoIterator for &'a Diagnostics<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// One line per diagnostic: `<label> <line>:<column>: <message>`
impl<E: Diagnostic> fmt::Display for Diagnostics<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            let loc = item.location();
            writeln!(f, "{} {}:{}: {}", item.label(), loc.line, loc.column, item)?;
        }
        if self.dropped > 0 {
            writeln!(f, "... {} more not shown", self.dropped)?;
        }
        Ok(())
    }
}
