//! Main TUI application state and logic

use crate::diagnostics::Diagnostic;
use crate::parser::ast::{AstNode, SourceLocation};
use crate::parser::lexer::Lexer;
use crate::parser::parse::{Parser, ParserConfig};
use crate::semantic::SemanticAnalyzer;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

use super::panes::SourceScrollState;

/// Which phase produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Syntax,
    Semantic,
}

/// One row of the diagnostics pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticEntry {
    pub phase: Phase,
    pub is_warning: bool,
    pub location: SourceLocation,
    pub message: String,
}

/// Results of running the front end over one source file
#[derive(Debug, Clone)]
pub struct Inspection {
    pub tree: AstNode,
    pub tree_lines: Vec<(usize, String)>,
    pub syntax_errors: usize,
    /// `None` when analysis was skipped because of syntax errors
    pub semantic_passed: Option<bool>,
    /// Syntax errors, or semantic errors and warnings, ordered by position
    pub entries: Vec<DiagnosticEntry>,
}

impl Inspection {
    pub fn run(source: &str, max_errors: usize) -> Self {
        let config = ParserConfig {
            max_errors,
            ..ParserConfig::default()
        };
        let mut parser = Parser::with_config(Lexer::new(source), config);
        let tree = parser.parse();

        let mut entries: Vec<DiagnosticEntry> = parser
            .errors()
            .iter()
            .map(|err| DiagnosticEntry {
                phase: Phase::Syntax,
                is_warning: false,
                location: err.location(),
                message: err.to_string(),
            })
            .collect();

        // A tree with syntax errors is incomplete, so analysis is skipped
        let semantic_passed = if parser.has_errors() {
            None
        } else {
            let mut analyzer = SemanticAnalyzer::with_error_limit(max_errors);
            let passed = analyzer.analyze(&tree);
            entries.extend(
                analyzer
                    .errors()
                    .iter()
                    .chain(analyzer.warnings())
                    .map(|err| DiagnosticEntry {
                        phase: Phase::Semantic,
                        is_warning: err.is_warning(),
                        location: err.location(),
                        message: err.to_string(),
                    }),
            );
            Some(passed)
        };

        entries.sort_by_key(|e| (e.location.line, e.location.column));

        Inspection {
            tree_lines: tree.tree_lines(),
            tree,
            syntax_errors: parser.error_count() + parser.diagnostics().dropped(),
            semantic_passed,
            entries,
        }
    }

    /// Sorted, de-duplicated lines that carry at least one diagnostic
    pub fn error_lines(&self) -> Vec<usize> {
        let mut lines: Vec<usize> = self.entries.iter().map(|e| e.location.line).collect();
        lines.dedup();
        lines
    }
}

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Ast,
    Diagnostics,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> diagnostics -> ast)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Diagnostics,
            FocusedPane::Diagnostics => FocusedPane::Ast,
            FocusedPane::Ast => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Ast,
            FocusedPane::Diagnostics => FocusedPane::Source,
            FocusedPane::Ast => FocusedPane::Diagnostics,
        }
    }
}

/// The main application state
pub struct App {
    /// Name shown in the status bar
    pub file_name: String,

    pub source_code: String,
    pub inspection: Inspection,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll state
    pub source_scroll: SourceScrollState,
    pub ast_scroll: usize,

    /// Index into `inspection.entries`
    pub selected_diagnostic: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    error_lines: Vec<usize>,
}

impl App {
    pub fn new(file_name: String, source_code: String, inspection: Inspection) -> Self {
        App {
            file_name,
            source_code,
            error_lines: inspection.error_lines(),
            inspection,
            focused_pane: FocusedPane::Diagnostics,
            source_scroll: SourceScrollState::default(),
            ast_scroll: 0,
            selected_diagnostic: 0,
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Line of the selected diagnostic, 0 if there is none
    pub fn selected_line(&self) -> usize {
        self.inspection
            .entries
            .get(self.selected_diagnostic)
            .map_or(0, |e| e.location.line)
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Diagnostics (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let selected_line = self.selected_line();

        super::panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            &self.error_lines,
            selected_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_diagnostics_pane(
            frame,
            left_rows[1],
            &self.inspection.entries,
            self.selected_diagnostic,
            self.focused_pane == FocusedPane::Diagnostics,
        );

        super::panes::render_ast_pane(
            frame,
            columns[1],
            &self.inspection.tree_lines,
            self.focused_pane == FocusedPane::Ast,
            &mut self.ast_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.file_name,
            self.inspection.syntax_errors,
            self.inspection.semantic_passed,
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    if self.selected_line() > 0 {
                        // Scrolling up makes the selected line move down visually
                        if let Some(row) = self.source_scroll.target_line_row {
                            self.source_scroll.target_line_row = Some(row.saturating_add(1));
                        }
                    } else {
                        self.source_scroll.offset = self.source_scroll.offset.saturating_sub(1);
                    }
                }
                FocusedPane::Ast => {
                    self.ast_scroll = self.ast_scroll.saturating_sub(1);
                }
                FocusedPane::Diagnostics => {
                    self.selected_diagnostic = self.selected_diagnostic.saturating_sub(1);
                    self.source_scroll.target_line_row = None;
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    if self.selected_line() > 0 {
                        if let Some(row) = self.source_scroll.target_line_row {
                            self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                        }
                    } else {
                        self.source_scroll.offset = self.source_scroll.offset.saturating_add(1);
                    }
                }
                FocusedPane::Ast => {
                    self.ast_scroll = self.ast_scroll.saturating_add(1);
                }
                FocusedPane::Diagnostics => {
                    let last = self.inspection.entries.len().saturating_sub(1);
                    self.selected_diagnostic = (self.selected_diagnostic + 1).min(last);
                    self.source_scroll.target_line_row = None;
                }
            },
            _ => {}
        }
    }
}
