//! Status bar rendering with phase verdicts and keybindings

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the status bar at the bottom.
///
/// `semantic_passed` is `None` when analysis was skipped because of syntax errors.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    syntax_errors: usize,
    semantic_passed: Option<bool>,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let badge = |text: String, color: Color| {
        Span::styled(
            text,
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    };
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let syntax_badge = if syntax_errors == 0 {
        badge(" SYNTAX OK ".to_string(), DEFAULT_THEME.success)
    } else {
        badge(format!(" SYNTAX {} ERR ", syntax_errors), DEFAULT_THEME.error)
    };
    let semantic_badge = match semantic_passed {
        Some(true) => badge(" SEMANTIC PASS ".to_string(), DEFAULT_THEME.success),
        Some(false) => badge(" SEMANTIC FAIL ".to_string(), DEFAULT_THEME.error),
        None => badge(" SEMANTIC SKIPPED ".to_string(), DEFAULT_THEME.comment),
    };

    let left_spans = vec![
        syntax_badge,
        Span::styled(" ", sep_style),
        semantic_badge,
        Span::styled(" | ", sep_style),
        Span::styled(
            format!(" {} ", message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.fg),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    // Right side: Keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);

    let right_spans = vec![
        Span::styled(" ⇥ ", key_style),
        Span::styled(" focus ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ↑/↓ ", key_style),
        Span::styled(" scroll/select ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" q ", key_style),
        Span::styled(" quit ", desc_style),
    ];

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}
