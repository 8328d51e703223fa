// Limits shared by the lexer, parser and semantic analyzer

/// Default capacity of a diagnostic list (syntax or semantic).
/// Errors reported after the list is full are counted but not stored.
pub const MAX_ERRORS: usize = 256;

/// Maximum nesting of blocks and parenthesised expressions.
/// Keeps recursive descent and every later tree walk off the end of the stack.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Longest lexeme the lexer accepts for identifiers and number literals.
pub const MAX_LEXEME_LEN: usize = 99;
