//! Source code pane rendering with syntax highlighting
//!
//! This module renders the source code pane, which displays the minic program
//! under inspection with basic syntax highlighting and diagnostic markers.
//!
//! # Features
//!
//! - Syntax highlighting for minic keywords, numbers, and comments
//! - Lines with a diagnostic get a dim red background and a marker
//! - The line of the selected diagnostic is kept at a fixed visual row
//! - Line numbering

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Simple syntax highlighting for one line of minic
fn highlight_source_code(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Line comments run to the end
        if c == '/' && chars.get(i + 1) == Some(&'/') {
            if !current_word.is_empty() {
                spans.push(Span::styled(current_word.clone(), word_style(&current_word)));
                current_word.clear();
            }
            spans.push(Span::styled(
                chars[i..].iter().collect::<String>(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            break;
        }

        if !c.is_alphanumeric() && c != '_' {
            if !current_word.is_empty() {
                spans.push(Span::styled(current_word.clone(), word_style(&current_word)));
                current_word.clear();
            }

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };

            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    if !current_word.is_empty() {
        let style = word_style(&current_word);
        spans.push(Span::styled(current_word, style));
    }

    Line::from(spans)
}

fn word_style(word: &str) -> Style {
    match word {
        "int" | "float" | "char" => Style::default().fg(DEFAULT_THEME.type_name),
        "if" | "while" | "repeat" | "until" | "print" | "factorial" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        _ if word.starts_with(|c: char| c.is_ascii_digit()) => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    /// Visual row the selected line is pinned to (None = center on first render)
    pub target_line_row: Option<usize>,
}

/// Render the source code pane.
///
/// `error_lines` must be sorted; `selected_line` is 1-based, 0 for none.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    error_lines: &[usize],
    selected_line: usize,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();

    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // Keep the selected line at the target visual row
    if selected_line > 0 && selected_line <= total_lines {
        scroll_state.offset = (selected_line - 1).saturating_sub(target_row);
    }
    let max_scroll = total_lines.saturating_sub(visible_height);
    scroll_state.offset = scroll_state.offset.min(max_scroll);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_selected = line_num == selected_line;
            let has_error = error_lines.binary_search(&line_num).is_ok();

            let marker = if has_error { "●" } else { " " };
            let line_num_str = format!("{:4}{}", line_num, marker);

            let (num_style, background) = if is_selected {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                    Some(
                        Style::default()
                            .bg(DEFAULT_THEME.error)
                            .fg(Color::Black)
                            .add_modifier(Modifier::BOLD),
                    ),
                )
            } else if has_error {
                (
                    Style::default().fg(DEFAULT_THEME.error),
                    Some(Style::default().bg(DEFAULT_THEME.error_line_bg)),
                )
            } else {
                (Style::default().fg(DEFAULT_THEME.comment), None)
            };

            let mut content_line = highlight_source_code(line);
            if let Some(bg) = background {
                for span in &mut content_line.spans {
                    span.style = span.style.patch(bg);
                }
            }

            let mut final_spans = vec![Span::styled(line_num_str, num_style)];
            final_spans.extend(content_line.spans);

            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
