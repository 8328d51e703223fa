//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source code display with syntax highlighting and diagnostic markers
//! - [`ast`]: Indented syntax tree
//! - [`diagnostics`]: Selectable list of syntax errors, semantic errors and warnings
//! - [`status`]: Status bar with phase verdicts and keybindings
//!
//! Each pane module exports a primary `render_*_pane()` function (the status
//! bar exports `render_status_bar`) plus whatever scroll state it owns.

pub mod ast;
pub mod diagnostics;
pub mod source;
pub mod status;

// Re-export render functions for convenience
pub use ast::render_ast_pane;
pub use diagnostics::render_diagnostics_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use status::render_status_bar;
