//! Terminal inspector built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: inspection results, keyboard event loop, pane focus and selection
//! - **[`panes`]**: render functions for each visible pane (source, syntax tree,
//!   diagnostics, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with an
//! [`app::Inspection`] of the source and call [`App::run`] to start the event loop.
//!
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::{App, Inspection};
